mod common;
mod config_loading;
mod token_wire_format;
