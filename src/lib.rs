pub mod api;
pub mod cli {
    pub mod parser;
}
pub mod config;
pub mod logging;
pub mod output;
pub mod run;
pub mod storage;
