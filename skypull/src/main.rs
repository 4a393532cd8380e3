use colored::Colorize;
use skypull::commands::command_argument_builder;
use skypull::handlers;
use skypull_core::print_banner;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    let result = match chosen_command.subcommand() {
        Some(("pull", primary_command)) => handlers::handle_pull(primary_command).await,
        Some(("resolve", primary_command)) => handlers::handle_resolve(primary_command).await,
        None => return,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {e:#}", "✗".red().bold());
        std::process::exit(1);
    }
}
