//! `diploma institution`: register and look up institutions.

use clap::Subcommand;
use serde::{Deserialize, Serialize};

use diploma_core::Institution;

use super::client::NodeClient;

#[derive(Subcommand, Debug)]
pub enum InstitutionCommand {
    /// Register a new institution.
    Add {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        address: String,
    },
    /// List every registered institution.
    List,
    /// Show one institution.
    Show { id: String },
}

#[derive(Serialize)]
struct CreateInstitutionRequest<'a> {
    name: &'a str,
    address: &'a str,
}

#[derive(Deserialize)]
struct InstitutionResponse {
    institution: Institution,
}

#[derive(Deserialize)]
struct InstitutionsResponse {
    institutions: Vec<Institution>,
}

fn print_institution(institution: &Institution) {
    println!("  ID:       {}", institution.id);
    println!("  Name:     {}", institution.name);
    println!("  Address:  {}", institution.address);
    println!("  Created:  {}", institution.created_at.to_rfc3339());
}

pub async fn run(client: &NodeClient, command: &InstitutionCommand) -> anyhow::Result<()> {
    match command {
        InstitutionCommand::Add { name, address } => {
            let body = CreateInstitutionRequest { name, address };
            let resp: InstitutionResponse = client.post("/institutions", &body).await?;
            println!("Institution registered!");
            print_institution(&resp.institution);
        }
        InstitutionCommand::List => {
            let resp: InstitutionsResponse = client.get("/institutions").await?;
            println!("{} institution(s):", resp.institutions.len());
            for institution in &resp.institutions {
                println!("  {}  {}", institution.id, institution.name);
            }
        }
        InstitutionCommand::Show { id } => {
            let resp: InstitutionResponse = client.get(&format!("/institutions/{}", id)).await?;
            println!("Institution:");
            print_institution(&resp.institution);
        }
    }
    Ok(())
}
