/*
[INPUT]:  Parsed console command and a ready AdminSession
[OUTPUT]: Human-readable results on stdout
[POS]:    Command layer - one handler per console subcommand
[UPDATE]: When adding console commands or changing their output
*/

use anyhow::{Context, Result, anyhow};
use clap::Subcommand;
use console::style;
use dialoguer::{Input, Password, theme::ColorfulTheme};
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use veygo_admin_adapter::{
    AddApartmentStatus, AdminSession, Apartment, NewApartment, PublishRenter, Tax,
    TransponderCompany, VeygoError, find_renter,
};

/// Password source for non-interactive logins
pub const PASSWORD_ENV: &str = "VEYGO_ADMIN_PASSWORD";

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Sign in and store the session credential
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Validate the stored session and show the signed-in admin
    Whoami,
    /// List apartments
    Apartments,
    /// List taxes
    Taxes,
    /// List toll transponder companies
    TollCompanies,
    /// List renters, or show one with --id
    Renters {
        #[arg(long)]
        id: Option<i64>,
    },
    /// Create an apartment from a YAML or JSON file
    AddApartment {
        #[arg(long, value_name = "PATH")]
        file: PathBuf,
    },
    /// Revoke the session server-side and forget it locally
    Logout,
}

pub async fn run(session: &AdminSession, command: Command) -> Result<()> {
    match command {
        Command::Login { email } => login(session, email).await,
        Command::Whoami => {
            let admin = session.validate().await.context("validate session")?;
            print_profile(&admin);
            Ok(())
        }
        Command::Apartments => {
            let apartments = session.apartments().await.context("fetch apartments")?;
            print_apartments(&apartments);
            Ok(())
        }
        Command::Taxes => {
            let taxes = session.taxes().await.context("fetch taxes")?;
            print_taxes(&taxes);
            Ok(())
        }
        Command::TollCompanies => {
            let companies = session
                .toll_companies()
                .await
                .context("fetch toll companies")?;
            print_toll_companies(&companies);
            Ok(())
        }
        Command::Renters { id } => {
            let renters = session.renters().await.context("fetch renters")?;
            match id {
                Some(id) => {
                    let renter =
                        find_renter(&renters, id).ok_or_else(|| anyhow!("renter {id} not found"))?;
                    print_profile(renter);
                }
                None => print_renters(&renters),
            }
            Ok(())
        }
        Command::AddApartment { file } => {
            let apartment = read_new_apartment(&file)?;
            let name = apartment.name.clone();
            match session.add_apartment(apartment).await.context("add apartment")? {
                AddApartmentStatus::Created => {
                    println!("{} {}", style("Created").green(), name);
                }
                AddApartmentStatus::AlreadyExists => {
                    println!("{} {}", style("Already exists:").yellow(), name);
                }
            }
            Ok(())
        }
        Command::Logout => {
            session.logout().await.context("log out")?;
            println!("{}", style("Logged out").green());
            Ok(())
        }
    }
}

/// Run `command` unless `interrupt` fires first.
///
/// A failing `interrupt` (no signal handler could be installed) is logged and
/// the command runs to completion.
pub async fn run_until_interrupted<C, I>(command: C, interrupt: I) -> Result<()>
where
    C: Future<Output = Result<()>>,
    I: Future<Output = std::io::Result<()>>,
{
    tokio::pin!(command);
    tokio::select! {
        result = &mut command => result,
        signal = interrupt => match signal {
            Ok(()) => Err(anyhow!("interrupted")),
            Err(err) => {
                warn!(error = %err, "failed to install SIGINT handler");
                command.await
            }
        },
    }
}

/// Whether the failure came from a timeout, a refused connection or a 5xx.
pub fn is_transient(err: &anyhow::Error) -> bool {
    err.downcast_ref::<VeygoError>()
        .is_some_and(VeygoError::is_retryable)
}

async fn login(session: &AdminSession, email: Option<String>) -> Result<()> {
    let theme = ColorfulTheme::default();
    let email = match email {
        Some(email) => email,
        None => Input::<String>::with_theme(&theme)
            .with_prompt("Email")
            .interact_text()?,
    };
    let password = match std::env::var(PASSWORD_ENV) {
        Ok(password) => password,
        Err(_) => Password::with_theme(&theme)
            .with_prompt("Password")
            .interact()?,
    };

    let admin = session
        .login(&email, &password)
        .await
        .context("log in")?;
    info!(admin_id = admin.id, "session stored");
    println!("{} {}", style("Signed in as").green(), style(&admin.name).bold());
    Ok(())
}

/// Parse a new-apartment payload; YAML is a superset of JSON so both work.
pub fn read_new_apartment(path: &Path) -> Result<NewApartment> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read apartment file {}", path.display()))?;
    serde_yaml::from_str(&content).context("parse apartment file")
}

fn print_profile(renter: &PublishRenter) {
    let today = chrono::Local::now().date_naive();
    println!("{}", style(&renter.name).bold().cyan());
    println!("  id:            {}", renter.id);
    println!(
        "  email:         {} ({})",
        renter.student_email,
        if renter.email_is_valid(today) { "verified" } else { "unverified" }
    );
    println!("  phone:         {}", renter.phone);
    println!("  apartment:     {}", renter.apartment_id);
    println!("  plan:          {:?}", renter.plan_tier);
    println!(
        "  employee tier: {:?}{}",
        renter.employee_tier,
        if renter.employee_tier.is_staff() { " (staff)" } else { "" }
    );
}

fn print_apartments(apartments: &[Apartment]) {
    if apartments.is_empty() {
        println!("{}", style("No apartments found.").yellow());
        return;
    }
    for apartment in apartments {
        let flags = match (apartment.is_operating, apartment.is_public) {
            (true, true) => "operating, public",
            (true, false) => "operating, private",
            (false, _) => "closed",
        };
        println!(
            "{:>4} | {} | {} | {}",
            apartment.id, apartment.name, apartment.address, flags
        );
    }
}

fn print_taxes(taxes: &[Tax]) {
    if taxes.is_empty() {
        println!("{}", style("No taxes found.").yellow());
        return;
    }
    for tax in taxes {
        let state = if tax.is_effective { "effective" } else { "inactive" };
        println!("{:>4} | {} | {} | {}", tax.id, tax.name, tax.multiplier, state);
    }
}

fn print_toll_companies(companies: &[TransponderCompany]) {
    if companies.is_empty() {
        println!("{}", style("No toll companies found.").yellow());
        return;
    }
    for company in companies {
        println!(
            "{:>4} | {} | {}",
            company.id,
            company.name,
            company.timezone.as_deref().unwrap_or("-")
        );
    }
}

fn print_renters(renters: &[PublishRenter]) {
    if renters.is_empty() {
        println!("{}", style("No renters found.").yellow());
        return;
    }
    for renter in renters {
        println!(
            "{:>6} | {} | {} | {:?}",
            renter.id, renter.name, renter.student_email, renter.plan_tier
        );
    }
}
