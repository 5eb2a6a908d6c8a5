//! Credential lifecycle commands: `issue`, `revoke`, `renew`, `share`,
//! `show`, and `list`.

use anyhow::{bail, Context};
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use serde::{Deserialize, Serialize};

use diploma_core::{Credential, CredentialShare};

use super::client::NodeClient;

#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Student the credential is issued to.
    #[arg(short, long)]
    pub student: String,

    /// Issuing institution.
    #[arg(short, long)]
    pub institution: String,

    #[arg(short, long)]
    pub course: String,

    #[arg(short, long)]
    pub degree: String,

    /// Graduation year, e.g. 2024.
    #[arg(short = 'y', long)]
    pub graduation_year: i32,

    /// Shared secret configured on the node.
    #[arg(long, env = "DIPLOMA_TOKEN")]
    pub token: String,
}

#[derive(Args, Debug)]
pub struct RevokeArgs {
    pub id: String,

    /// Why the credential is being revoked; sent to the student.
    #[arg(short, long)]
    pub reason: String,

    #[arg(long, env = "DIPLOMA_TOKEN")]
    pub token: String,
}

#[derive(Args, Debug)]
pub struct RenewArgs {
    pub id: String,

    #[arg(long, env = "DIPLOMA_TOKEN")]
    pub token: String,
}

#[derive(Args, Debug)]
pub struct ShareArgs {
    pub id: String,

    /// Who receives access.
    #[arg(short, long)]
    pub recipient: String,

    /// Days until the share expires.
    #[arg(long, default_value_t = 30)]
    pub days: i64,

    /// Permissions, comma-separated.
    #[arg(short, long, value_delimiter = ',', default_value = "view")]
    pub permissions: Vec<String>,

    #[arg(long, env = "DIPLOMA_TOKEN")]
    pub token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IssueRequest<'a> {
    student_id: &'a str,
    institution_id: &'a str,
    course: &'a str,
    degree: &'a str,
    graduation_year: i32,
    token: &'a str,
}

#[derive(Serialize)]
struct RevokeRequest<'a> {
    reason: &'a str,
    token: &'a str,
}

#[derive(Serialize)]
struct RenewRequest<'a> {
    token: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShareRequest<'a> {
    recipient_id: &'a str,
    expiration_date: DateTime<Utc>,
    permissions: &'a [String],
    token: &'a str,
}

#[derive(Deserialize)]
struct CredentialResponse {
    credential: Credential,
}

#[derive(Deserialize)]
pub(crate) struct CredentialsResponse {
    pub credentials: Vec<Credential>,
}

#[derive(Deserialize)]
struct LifecycleResponse {
    message: String,
    credential: Credential,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShareResponse {
    credential_share: CredentialShare,
}

pub(crate) fn print_credential(credential: &Credential) {
    println!("  ID:           {}", credential.id);
    println!("  Student:      {}", credential.student_id);
    println!("  Institution:  {}", credential.institution_id);
    println!("  Course:       {}", credential.course);
    println!("  Degree:       {}", credential.degree);
    println!("  Graduated:    {}", credential.graduation_year);
    println!("  Issued:       {}", credential.issued_at.to_rfc3339());
    println!("  Expires:      {}", credential.expiration_date.to_rfc3339());
    println!("  Renewals:     {}", credential.renewal_count);
    println!("  State:        {}", credential.state_at(Utc::now()));
}

/// One line per credential for listings.
pub(crate) fn summarize(credential: &Credential) -> String {
    format!(
        "{}  {} {} ({})  {}",
        credential.id,
        credential.degree,
        credential.course,
        credential.graduation_year,
        credential.state_at(Utc::now())
    )
}

pub async fn issue(client: &NodeClient, args: &IssueArgs) -> anyhow::Result<()> {
    let body = IssueRequest {
        student_id: &args.student,
        institution_id: &args.institution,
        course: &args.course,
        degree: &args.degree,
        graduation_year: args.graduation_year,
        token: &args.token,
    };
    let resp: CredentialResponse = client.post("/credentials", &body).await?;
    println!("Credential issued!");
    print_credential(&resp.credential);
    Ok(())
}

pub async fn revoke(client: &NodeClient, args: &RevokeArgs) -> anyhow::Result<()> {
    let body = RevokeRequest {
        reason: &args.reason,
        token: &args.token,
    };
    let resp: LifecycleResponse = client
        .patch(&format!("/credential/{}/revoke", args.id), &body)
        .await?;
    println!("{}", resp.message);
    print_credential(&resp.credential);
    Ok(())
}

pub async fn renew(client: &NodeClient, args: &RenewArgs) -> anyhow::Result<()> {
    let body = RenewRequest { token: &args.token };
    let resp: LifecycleResponse = client
        .patch(&format!("/credentials/{}/renew", args.id), &body)
        .await?;
    println!("{}", resp.message);
    print_credential(&resp.credential);
    Ok(())
}

/// When a share created at `now` for `days` days runs out.
fn share_expiry(now: DateTime<Utc>, days: i64) -> anyhow::Result<DateTime<Utc>> {
    if days <= 0 {
        bail!("--days must be positive, got {}", days);
    }
    Duration::try_days(days)
        .and_then(|span| now.checked_add_signed(span))
        .with_context(|| format!("--days {} is out of range", days))
}

pub async fn share(client: &NodeClient, args: &ShareArgs) -> anyhow::Result<()> {
    let body = ShareRequest {
        recipient_id: &args.recipient,
        expiration_date: share_expiry(Utc::now(), args.days)?,
        permissions: &args.permissions,
        token: &args.token,
    };
    let resp: ShareResponse = client
        .post(&format!("/credentials/{}/share", args.id), &body)
        .await?;
    let share = resp.credential_share;
    println!("Credential shared!");
    println!("  Share ID:     {}", share.id);
    println!("  Credential:   {}", share.credential_id);
    println!("  Recipient:    {}", share.recipient_id);
    println!("  Expires:      {}", share.expiration_date.to_rfc3339());
    println!("  Permissions:  {}", share.permissions.join(", "));
    Ok(())
}

pub async fn show(client: &NodeClient, id: &str) -> anyhow::Result<()> {
    let resp: CredentialResponse = client.get(&format!("/credential/{}", id)).await?;
    println!("Credential:");
    print_credential(&resp.credential);
    Ok(())
}

pub async fn list(client: &NodeClient) -> anyhow::Result<()> {
    let resp: CredentialsResponse = client.get("/credentials").await?;
    println!("{} credential(s):", resp.credentials.len());
    for credential in &resp.credentials {
        println!("  {}", summarize(credential));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_shows_state() {
        let now = Utc::now();
        let mut credential = Credential::issue("s-1", "i-1", "CS", "BSc", 2024, now);
        assert!(summarize(&credential).ends_with("Active"));
        credential.revoke(now).unwrap();
        assert!(summarize(&credential).ends_with("Revoked"));
    }

    #[test]
    fn test_issue_request_field_names() {
        let body = IssueRequest {
            student_id: "s-1",
            institution_id: "i-1",
            course: "CS",
            degree: "BSc",
            graduation_year: 2024,
            token: "t",
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["studentId"], "s-1");
        assert_eq!(value["graduationYear"], 2024);
    }

    #[test]
    fn test_share_expiry() {
        let now = Utc::now();
        assert_eq!(share_expiry(now, 30).unwrap(), now + Duration::days(30));
        assert!(share_expiry(now, 0).is_err());
        assert!(share_expiry(now, i64::MAX).is_err());
        assert!(share_expiry(now, 1_000_000_000).is_err());
    }
}
