mod args;
mod broker;
mod config;
mod distribution;
mod entry;
mod error;
mod generator;
mod lifecycle;
mod logger;
mod message;
mod msglog;
mod shutdown;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
