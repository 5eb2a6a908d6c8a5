//! Diploma CLI: command-line client for the credential registry node.
//!
//! Subcommands: health, student, institution, issue, revoke, renew, share,
//! show, list, search, verify, notifications.

mod commands;

use clap::{Parser, Subcommand};

use commands::client::{NodeClient, DEFAULT_ENDPOINT};

/// Diploma: academic credential registry.
#[derive(Parser, Debug)]
#[command(name = "diploma", version, about, long_about = None)]
struct Cli {
    /// API endpoint of the node.
    #[arg(long, global = true, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that the node is up.
    Health,
    /// Register and look up students.
    #[command(subcommand)]
    Student(commands::student::StudentCommand),
    /// Register and look up institutions.
    #[command(subcommand)]
    Institution(commands::institution::InstitutionCommand),
    /// Issue a credential to a student.
    Issue(commands::credential::IssueArgs),
    /// Revoke a credential.
    Revoke(commands::credential::RevokeArgs),
    /// Extend a credential's validity window.
    Renew(commands::credential::RenewArgs),
    /// Share a credential with a third party.
    Share(commands::credential::ShareArgs),
    /// Show one credential.
    Show { id: String },
    /// List every credential.
    List,
    /// Search credentials by course, degree, and graduation year.
    Search(commands::query::SearchArgs),
    /// Find a current credential for a student at an institution.
    Verify(commands::query::VerifyArgs),
    /// Show notifications sent to a recipient.
    Notifications { recipient_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = NodeClient::new(&cli.endpoint);

    match &cli.command {
        Commands::Health => commands::health::run(&client).await,
        Commands::Student(cmd) => commands::student::run(&client, cmd).await,
        Commands::Institution(cmd) => commands::institution::run(&client, cmd).await,
        Commands::Issue(args) => commands::credential::issue(&client, args).await,
        Commands::Revoke(args) => commands::credential::revoke(&client, args).await,
        Commands::Renew(args) => commands::credential::renew(&client, args).await,
        Commands::Share(args) => commands::credential::share(&client, args).await,
        Commands::Show { id } => commands::credential::show(&client, id).await,
        Commands::List => commands::credential::list(&client).await,
        Commands::Search(args) => commands::query::search(&client, args).await,
        Commands::Verify(args) => commands::query::verify(&client, args).await,
        Commands::Notifications { recipient_id } => {
            commands::notifications::run(&client, recipient_id).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_issue() {
        let cli = Cli::try_parse_from([
            "diploma", "issue", "--student", "s-1", "--institution", "i-1", "--course", "CS",
            "--degree", "BSc", "--graduation-year", "2024", "--token", "t",
        ])
        .unwrap();
        assert_eq!(cli.endpoint, DEFAULT_ENDPOINT);
        match cli.command {
            Commands::Issue(args) => {
                assert_eq!(args.student, "s-1");
                assert_eq!(args.graduation_year, 2024);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_student_add_with_endpoint() {
        let cli = Cli::try_parse_from([
            "diploma",
            "student",
            "add",
            "--name",
            "Ada",
            "--email",
            "ada@example.edu",
            "--endpoint",
            "http://node:9101",
        ])
        .unwrap();
        assert_eq!(cli.endpoint, "http://node:9101");
        assert!(matches!(
            cli.command,
            Commands::Student(commands::student::StudentCommand::Add { .. })
        ));
    }

    #[test]
    fn test_parse_share_permissions() {
        let cli = Cli::try_parse_from([
            "diploma", "share", "c-1", "--recipient", "r-1", "--permissions", "view,download",
            "--token", "t",
        ])
        .unwrap();
        match cli.command {
            Commands::Share(args) => {
                assert_eq!(args.permissions, vec!["view", "download"]);
                assert_eq!(args.days, 30);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
