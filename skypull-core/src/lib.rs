pub mod dataset;
pub mod expand;
pub mod members;
pub mod pull;

pub use dataset::DatasetFormat;
pub use expand::{ExpandOptions, FollowEdge, GraphTables, NodeRow, expand};
pub use pull::{PullOptions, execute_pull};

use colored::Colorize;

pub fn print_banner() {
    println!();
    println!("{}", "  s k y p u l l".bright_cyan().bold());
    println!(
        "{}",
        format!(
            "  v{} - Bluesky social graph puller",
            env!("CARGO_PKG_VERSION")
        )
        .bright_black()
    );
    println!();
}
