//! `diploma search` and `diploma verify`.

use clap::Args;
use serde::{Deserialize, Serialize};

use diploma_core::Credential;

use super::client::NodeClient;
use super::credential::{print_credential, summarize, CredentialsResponse};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Substring of the course name (case-sensitive).
    #[arg(short, long)]
    pub course: Option<String>,

    /// Substring of the degree (case-sensitive).
    #[arg(short, long)]
    pub degree: Option<String>,

    #[arg(short = 'y', long)]
    pub graduation_year: Option<i32>,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    #[arg(short, long)]
    pub student: String,

    #[arg(short, long)]
    pub institution: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    course: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    degree: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    graduation_year: Option<i32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyRequest<'a> {
    student_id: &'a str,
    institution_id: &'a str,
}

#[derive(Deserialize)]
struct VerifyResponse {
    message: String,
    credential: Credential,
}

pub async fn search(client: &NodeClient, args: &SearchArgs) -> anyhow::Result<()> {
    let body = SearchRequest {
        course: args.course.as_deref(),
        degree: args.degree.as_deref(),
        graduation_year: args.graduation_year,
    };
    let resp: CredentialsResponse = client.post("/search-credentials", &body).await?;
    println!("{} matching credential(s):", resp.credentials.len());
    for credential in &resp.credentials {
        println!("  {}", summarize(credential));
    }
    Ok(())
}

pub async fn verify(client: &NodeClient, args: &VerifyArgs) -> anyhow::Result<()> {
    let body = VerifyRequest {
        student_id: &args.student,
        institution_id: &args.institution,
    };
    let resp: VerifyResponse = client.post("/verify-credential", &body).await?;
    println!("{}", resp.message);
    print_credential(&resp.credential);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_omits_unset_filters() {
        let body = SearchRequest {
            course: Some("CS"),
            degree: None,
            graduation_year: None,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"course":"CS"}"#
        );
    }
}
