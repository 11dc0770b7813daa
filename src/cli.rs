use std::path::PathBuf;

use clap::{CommandFactory, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "codebuddy",
    about = "Run a source file, explain its errors and suggest a fix",
    version
)]
pub struct Cli {
    /// Source file to run (.py, .java, .c, .cpp).
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn usage() -> String {
        Self::command().render_usage().to_string()
    }
}
