// Thu Oct 15 2026 - Alex

use colored::Colorize;

fn main() {
    if let Err(err) = memstruct::ui::cli::run() {
        eprintln!("{} {:#}", "[ERROR]".red(), err);
        std::process::exit(1);
    }
}
