//! `diploma student`: register and look up students.

use clap::Subcommand;
use serde::{Deserialize, Serialize};

use diploma_core::Student;

use super::client::NodeClient;

#[derive(Subcommand, Debug)]
pub enum StudentCommand {
    /// Register a new student.
    Add {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
    },
    /// List every registered student.
    List,
    /// Show one student.
    Show { id: String },
}

#[derive(Serialize)]
struct CreateStudentRequest<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Deserialize)]
struct StudentResponse {
    student: Student,
}

#[derive(Deserialize)]
struct StudentsResponse {
    students: Vec<Student>,
}

fn print_student(student: &Student) {
    println!("  ID:       {}", student.id);
    println!("  Name:     {}", student.name);
    println!("  Email:    {}", student.email);
    println!("  Created:  {}", student.created_at.to_rfc3339());
}

pub async fn run(client: &NodeClient, command: &StudentCommand) -> anyhow::Result<()> {
    match command {
        StudentCommand::Add { name, email } => {
            let body = CreateStudentRequest { name, email };
            let resp: StudentResponse = client.post("/students", &body).await?;
            println!("Student registered!");
            print_student(&resp.student);
        }
        StudentCommand::List => {
            let resp: StudentsResponse = client.get("/students").await?;
            println!("{} student(s):", resp.students.len());
            for student in &resp.students {
                println!("  {}  {} <{}>", student.id, student.name, student.email);
            }
        }
        StudentCommand::Show { id } => {
            let resp: StudentResponse = client.get(&format!("/student/{}", id)).await?;
            println!("Student:");
            print_student(&resp.student);
        }
    }
    Ok(())
}
