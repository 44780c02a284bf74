// Thu Oct 15 2026 - Alex

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "memstruct")]
#[command(author = "Alex")]
#[command(version = "0.1.0")]
#[command(about = "Typed views over raw memory, core dumps and live processes", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the member layout of a record.
    Layout(LayoutArgs),
    /// Read a record out of a file mapped at a base address.
    Dump(DumpArgs),
    /// Read a record out of a running process.
    Peek(PeekArgs),
}

#[derive(Parser, Debug)]
pub struct LayoutArgs {
    #[arg(short, long)]
    pub schema: PathBuf,

    #[arg(short, long)]
    pub record: String,
}

#[derive(Parser, Debug)]
pub struct DumpArgs {
    #[arg(short, long)]
    pub schema: PathBuf,

    #[arg(short, long)]
    pub record: String,

    #[arg(short, long)]
    pub file: PathBuf,

    /// Address the first byte of the file is mapped at.
    #[arg(short, long, default_value = "0")]
    pub base: String,

    /// Address of the record; defaults to the base.
    #[arg(short, long)]
    pub address: Option<String>,

    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct PeekArgs {
    #[arg(short, long)]
    pub pid: i32,

    #[arg(short, long)]
    pub schema: PathBuf,

    #[arg(short, long)]
    pub record: String,

    #[arg(short, long)]
    pub address: String,

    #[arg(long)]
    pub json: bool,
}
