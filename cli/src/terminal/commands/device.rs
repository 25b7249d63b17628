//! `orbit device` command implementation.
//!
//! `device list` resolves one Apple team for the project's owning account,
//! then fetches and prints the devices registered under it. The command is
//! interactive by design: without `--apple-team-id` it prompts whenever the
//! account has more than one team.

use clap::{Args as ClapArgs, Subcommand};
use color_eyre::eyre::{Result, bail};
use dialoguer::{Select, theme::ColorfulTheme};
use tracing::debug;

use crate::result;
use crate::shell;
use orbit_cli::{
    api::{AppleTeam, DeviceQueries, HttpClient},
    device::{TeamContext, render_device_list},
    project::{self, Account},
    team::{self, TeamSelection},
};

/// Subcommands for `orbit device`.
#[derive(Subcommand, Debug)]
pub enum DeviceCommand {
    /// List all registered devices for your account.
    List(ListArgs),
}

/// Arguments for `orbit device list`.
#[derive(ClapArgs, Debug)]
pub struct ListArgs {
    /// List devices for this Apple team instead of resolving one interactively.
    #[arg(long = "apple-team-id", value_name = "id")]
    pub apple_team_id: Option<String>,
}

/// Run the `device list` command.
///
/// # Errors
/// Returns an error when a fetch fails or no Orbit project/credentials are
/// found. Accounts without teams and teams without devices end cleanly.
pub async fn list(args: ListArgs) -> Result<()> {
    let account = project::owner_account_for_cwd()?;
    let client = HttpClient::from_environment()?;
    run_list(&client, &account, args.apple_team_id).await
}

async fn run_list<Q: DeviceQueries>(
    queries: &Q,
    account: &Account,
    explicit: Option<String>,
) -> Result<()> {
    let Some(team_id) = resolve_team(queries, account, explicit).await? else {
        // Soft end: the failed spinner already said why.
        return Ok(());
    };

    // Every resolution path must yield a usable identifier.
    assert!(!team_id.is_empty(), "resolved Apple team identifier is empty");

    list_devices(queries, account, &team_id).await
}

/// Resolve the Apple team to list devices for.
///
/// Returns `None` when the account has no teams at all, which ends the
/// command cleanly.
async fn resolve_team<Q: DeviceQueries>(
    queries: &Q,
    account: &Account,
    explicit: Option<String>,
) -> Result<Option<String>> {
    if let Some(team_id) = team::explicit_identifier(explicit) {
        debug!(team = %team_id, "using explicit Apple team identifier");
        return Ok(Some(team_id));
    }

    match fetch_team_selection(queries, account).await? {
        TeamSelection::NoTeams => Ok(None),
        TeamSelection::Resolved(team_id) => Ok(Some(team_id)),
        TeamSelection::NeedsPrompt(teams) => Ok(Some(prompt_for_team(&teams)?)),
    }
}

/// Fetch the account's teams and plan the selection, reporting progress.
async fn fetch_team_selection<Q: DeviceQueries>(
    queries: &Q,
    account: &Account,
) -> Result<TeamSelection> {
    let spinner = shell::spinner("Fetching the list of teams for the project…");

    let teams = match queries.teams_for_account(&account.name).await {
        Ok(teams) => teams,
        Err(err) => {
            spinner.fail("Something went wrong and we couldn't fetch the list of teams");
            return Err(err.into());
        }
    };

    let plan = team::plan_selection(teams);
    if matches!(plan, TeamSelection::NoTeams) {
        spinner.fail(format!(
            "Couldn't find any teams for the account {}",
            account.name
        ));
    } else {
        spinner.succeed_quiet();
    }

    Ok(plan)
}

/// Ask the user to pick one of the account's Apple teams.
fn prompt_for_team(teams: &[AppleTeam]) -> Result<String> {
    if !shell::is_interactive() {
        bail!(
            "the account has {} Apple teams and the terminal is not interactive, \
             pass --apple-team-id to pick one",
            teams.len()
        );
    }

    let labels: Vec<String> = teams.iter().map(team::choice_label).collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("What Apple team would you like to list devices for?")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(teams[selection].apple_team_identifier.clone())
}

/// Fetch and print the devices registered under the resolved team.
async fn list_devices<Q: DeviceQueries>(
    queries: &Q,
    account: &Account,
    team_id: &str,
) -> Result<()> {
    let spinner = shell::spinner("Fetching the list of devices for the team…");

    let fetched = match queries.devices_for_team(&account.name, team_id).await {
        Ok(fetched) => fetched,
        Err(err) => {
            spinner.fail("Something went wrong and we couldn't fetch the device list");
            return Err(err.into());
        }
    };

    if fetched.apple_devices.is_empty() {
        spinner.fail(format!("Couldn't find any devices for the team {team_id}"));
        return Ok(());
    }

    let team_name = fetched.apple_team_name.as_deref();
    spinner.succeed(format!(
        "Found {} devices for team {}",
        fetched.apple_devices.len(),
        team_name.unwrap_or(team_id)
    ));

    let ctx = TeamContext {
        apple_team_name: team_name,
        apple_team_identifier: team_id,
    };
    let list = render_device_list(&fetched.apple_devices, &ctx);

    result!();
    result!("{list}");
    Ok(())
}
