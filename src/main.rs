// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! VivaFit session CLI
//!
//! Drives the session store from the command line: log in or register
//! against the configured auth service, inspect the remembered session, and
//! change appearance preferences.

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vivafit_session::{
    config::Config,
    models::{FontSize, PhysicalInfo, Registration, Theme, User, UserGoal, UserRole},
    AppState,
};

#[derive(Debug, Parser)]
#[command(name = "vivafit", version, about = "VivaFit session and preferences")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and remember the session
    Login { email: String, password: String },
    /// Create an account and sign in
    Register {
        name: String,
        email: String,
        password: String,
        #[arg(long, value_enum, default_value_t = UserRole::User)]
        role: UserRole,
        /// Weight in kg
        #[arg(long)]
        weight: Option<f64>,
        /// Height in cm
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        age: Option<f64>,
        #[arg(long = "goal", value_enum)]
        goals: Vec<UserGoal>,
        /// Describe any medical conditions
        #[arg(long)]
        medical_conditions: Option<String>,
        /// Describe any medication taken
        #[arg(long)]
        medication: Option<String>,
    },
    /// Forget the remembered session
    Logout,
    /// Show the remembered session and the resulting document classes
    Whoami,
    /// Set the color theme
    Theme {
        #[arg(value_enum)]
        theme: Theme,
    },
    /// Set the base font size
    FontSize {
        #[arg(value_enum)]
        size: FontSize,
    },
    /// Turn high-contrast mode on or off
    Contrast {
        #[arg(value_enum)]
        mode: Toggle,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = Config::from_env()?;
    let state = AppState::from_config(config)?;
    let store = state.store.clone();

    if let Err(e) = store.initialize() {
        // A corrupt slot should not lock the user out of logging in again.
        tracing::warn!(code = e.code(), error = %e, "Starting without a stored session");
    }

    match cli.command {
        Command::Login { email, password } => {
            let user = store.login(&email, &password).await?;
            print_user(&user)?;
        }
        Command::Register {
            name,
            email,
            password,
            role,
            weight,
            height,
            age,
            goals,
            medical_conditions,
            medication,
        } => {
            let has_info = weight.is_some()
                || height.is_some()
                || age.is_some()
                || !goals.is_empty()
                || medical_conditions.is_some()
                || medication.is_some();
            let physical_info = has_info.then(|| PhysicalInfo {
                weight,
                height,
                age,
                goals,
                has_medical_conditions: Some(medical_conditions.is_some()),
                medical_conditions_details: medical_conditions,
                takes_medication: Some(medication.is_some()),
                medication_details: medication,
            });

            let registration = Registration::new(name, email, password, role, physical_info);
            let user = store.register(registration).await?;
            print_user(&user)?;
        }
        Command::Logout => store.logout(),
        Command::Whoami => match store.user() {
            Some(user) => print_user(&user)?,
            None => println!("Not logged in"),
        },
        Command::Theme { theme } => store.apply_theme(theme),
        Command::FontSize { size } => store.apply_font_size(size),
        Command::Contrast { mode } => store.apply_high_contrast(matches!(mode, Toggle::On)),
    }

    println!("document classes: {}", state.document.classes().join(" "));
    store.dispose();
    Ok(())
}

fn print_user(user: &User) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(user)?);
    Ok(())
}

/// Initialize structured JSON logging on stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("vivafit_session=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
