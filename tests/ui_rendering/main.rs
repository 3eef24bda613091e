mod chat_flow_test;
mod common;
mod config_form_test;
