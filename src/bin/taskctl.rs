use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use taskdesk::client::dashboard::{confirms, task_line};
use taskdesk::client::{ApiClient, ClientError, Dashboard, SessionStore};
use taskdesk::models::{Role, TaskStatus, UpdateTaskRequest};
use uuid::Uuid;

/// Terminal client for the task management API.
#[derive(Parser, Debug)]
#[command(name = "taskctl", version, about)]
struct Cli {
    /// Base URL of the API server.
    #[arg(long, env = "TASKCTL_API_URL", default_value = "http://127.0.0.1:5000")]
    api_url: String,

    /// Session file. Defaults to the user's config directory.
    #[arg(long, env = "TASKCTL_SESSION")]
    session: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and log in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Register as an administrator
        #[arg(long)]
        admin: bool,
    },
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List your tasks, newest first
    List,
    /// Create a task
    Add {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Change a task's title or description
    Edit {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        /// Pass an empty string to clear the description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Mark a task as completed
    Done { id: Uuid },
    /// Mark a task as pending again
    Reopen { id: Uuid },
    /// Delete a task
    Rm {
        id: Uuid,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show one task
    Show { id: Uuid },
    /// List every task in the system (administrators only)
    All,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("warn"));
    let cli = Cli::parse();

    let Some(session_path) = cli.session.clone().or_else(SessionStore::default_path) else {
        eprintln!("error: no config directory found, pass --session <FILE>");
        return ExitCode::FAILURE;
    };
    let client = ApiClient::new(cli.api_url.clone(), SessionStore::new(session_path));

    match run(client, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.needs_login() => {
            eprintln!("{}", err);
            eprintln!("Log in with: taskctl login --email <EMAIL> --password <PASSWORD>");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(client: ApiClient, command: Command) -> Result<(), ClientError> {
    match command {
        Command::Register {
            name,
            email,
            password,
            admin,
        } => {
            let role = admin.then_some(Role::Admin);
            let session = client.register(&name, &email, &password, role).await?;
            println!("Registered and logged in as {} <{}>", session.user.name, session.user.email);
        }
        Command::Login { email, password } => {
            let session = client.login(&email, &password).await?;
            println!("Logged in as {} <{}>", session.user.name, session.user.email);
        }
        Command::Logout => {
            client.logout()?;
            println!("Logged out");
        }
        Command::Whoami => {
            let user = client.me().await?;
            println!("{} <{}> ({})", user.name, user.email, user.role);
        }
        Command::List => {
            print!("{}", Dashboard::open(client).await?);
        }
        Command::Add { title, description } => {
            let mut dashboard = Dashboard::open(client).await?;
            dashboard.add(&title, description.as_deref()).await?;
            print!("{}", dashboard);
        }
        Command::Edit {
            id,
            title,
            description,
        } => {
            let mut dashboard = Dashboard::open(client).await?;
            dashboard.start_edit(id);
            dashboard
                .save_edit(UpdateTaskRequest {
                    title,
                    description,
                    status: None,
                })
                .await?;
            print!("{}", dashboard);
        }
        Command::Done { id } => {
            let mut dashboard = Dashboard::open(client).await?;
            dashboard.set_status(id, TaskStatus::Completed).await?;
            print!("{}", dashboard);
        }
        Command::Reopen { id } => {
            let mut dashboard = Dashboard::open(client).await?;
            dashboard.set_status(id, TaskStatus::Pending).await?;
            print!("{}", dashboard);
        }
        Command::Rm { id, yes } => {
            let mut dashboard = Dashboard::open(client).await?;
            if !yes {
                let title = dashboard.task(id).map_or("this task", |t| t.title.as_str());
                print!("Delete \"{}\"? [y/N] ", title);
                io::stdout().flush()?;
                let mut answer = String::new();
                io::stdin().read_line(&mut answer)?;
                if !confirms(&answer) {
                    println!("Cancelled");
                    return Ok(());
                }
            }
            dashboard.remove(id).await?;
            print!("{}", dashboard);
        }
        Command::Show { id } => {
            let task = client.get_task(id).await?;
            println!("{}", task_line(&task));
            println!("  owner:   {} <{}>", task.created_by.name, task.created_by.email);
            println!("  created: {}", task.created_at);
            println!("  updated: {}", task.updated_at);
        }
        Command::All => {
            let tasks = client.list_all_tasks().await?;
            println!("{} task(s)", tasks.len());
            for task in &tasks {
                println!("  {} ({})", task_line(task), task.created_by.email);
            }
        }
    }
    Ok(())
}
