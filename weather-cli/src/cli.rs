use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{Confirm, Select, Text};
use realworld_weather_core::{
    Config, HostBindings, JsonSettingsStore, OpenMeteoClient, TextField, WeatherSession,
    provider::open_meteo_from_config,
};

use crate::host::{Draft, NoteFile, TerminalDisplay, TerminalNotifier};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "rwweather", version, about = "Real-world weather for your chats")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Units {
    /// Celsius and km/h.
    C,
    /// Fahrenheit and mph.
    F,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set location, auto-inject and units.
    Configure,

    /// Set the location: "City", "City, Region" or "lat,lon".
    Location {
        /// Location text.
        #[arg(allow_hyphen_values = true)]
        text: String,
    },

    /// Keep the weather line in the author's note up to date.
    AutoInject {
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Choose display units.
    Units {
        #[arg(value_enum)]
        units: Units,
    },

    /// Fetch current weather for the configured location.
    Fetch,

    /// Show the last fetched weather.
    Show,

    /// Append the weather line to a compose-box draft and print it.
    Insert {
        /// Existing draft text.
        #[arg(long, default_value = "")]
        draft: String,
    },

    /// Print the author's note.
    Note,
}

/// Everything one command needs: config, stores and a session wired to the terminal.
struct App {
    session: WeatherSession,
    note: Arc<NoteFile>,
    compose: Arc<Draft>,
}

impl App {
    fn open(draft: String) -> anyhow::Result<Self> {
        let config = Config::load()?;
        let store = JsonSettingsStore::new(Config::settings_file_path()?);
        let settings = store.load()?;

        let client: Arc<OpenMeteoClient> = Arc::new(
            open_meteo_from_config(&config.services)
                .context("Failed to set up the Open-Meteo client")?,
        );
        let note = Arc::new(NoteFile::new(config.author_note_file_path()?));
        let compose = Arc::new(Draft::new(draft));

        let host = HostBindings {
            store: Arc::new(store),
            notifier: Arc::new(TerminalNotifier),
            display: Arc::new(TerminalDisplay),
            author_note: note.clone(),
            compose_box: compose.clone(),
        };

        Ok(Self {
            session: WeatherSession::new(settings, client.clone(), client, host),
            note,
            compose,
        })
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let draft = match &self.command {
            Command::Insert { draft } => draft.clone(),
            _ => String::new(),
        };
        let mut app = App::open(draft)?;

        match self.command {
            Command::Configure => configure(&mut app.session)?,
            Command::Location { text } => app.session.set_location(&text),
            Command::AutoInject { state } => app.session.set_auto_inject(state == Toggle::On),
            Command::Units { units } => app.session.set_use_celsius(units == Units::C),
            Command::Fetch => {
                app.session.request_weather().await;
            }
            Command::Show => app.session.show(),
            Command::Insert { .. } => {
                if app.session.insert_into_compose_box().is_ok() {
                    println!("{}", app.compose.read()?);
                }
            }
            Command::Note => println!("{}", app.note.read()?),
        }

        Ok(())
    }
}

fn configure(session: &mut WeatherSession) -> anyhow::Result<()> {
    let settings = session.settings().clone();

    let location = Text::new("Location:")
        .with_default(&settings.location)
        .with_help_message("e.g. \"Decatur, Georgia\", \"Paris, France\" or \"33.7748,-84.2963\"")
        .prompt()
        .context("Failed to read location")?;

    let auto_inject = Confirm::new("Keep the weather in the author's note?")
        .with_default(settings.auto_inject)
        .prompt()
        .context("Failed to read auto-inject choice")?;

    let unit_options = vec!["Fahrenheit (°F, mph)", "Celsius (°C, km/h)"];
    let start = usize::from(settings.use_celsius);
    let units = Select::new("Units:", unit_options.clone())
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read units")?;

    session.set_location(location.trim());
    session.set_auto_inject(auto_inject);
    session.set_use_celsius(units == unit_options[1]);

    println!("Settings saved.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_toggles() {
        let cli = Cli::try_parse_from(["rwweather", "auto-inject", "on"]).unwrap();
        assert!(matches!(cli.command, Command::AutoInject { state: Toggle::On }));

        let cli = Cli::try_parse_from(["rwweather", "units", "c"]).unwrap();
        assert!(matches!(cli.command, Command::Units { units: Units::C }));
    }

    #[test]
    fn parses_insert_draft() {
        let cli = Cli::try_parse_from(["rwweather", "insert", "--draft", "Hi"]).unwrap();
        match cli.command {
            Command::Insert { draft } => assert_eq!(draft, "Hi"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn location_accepts_coordinates() {
        let cli = Cli::try_parse_from(["rwweather", "location", "33.7748,-84.2963"]).unwrap();
        match cli.command {
            Command::Location { text } => assert_eq!(text, "33.7748,-84.2963"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn location_accepts_negative_latitude() {
        let cli = Cli::try_parse_from(["rwweather", "location", "-33.8688,151.2093"]).unwrap();
        assert!(matches!(cli.command, Command::Location { .. }));
    }

    #[test]
    fn rejects_unknown_toggle() {
        assert!(Cli::try_parse_from(["rwweather", "auto-inject", "maybe"]).is_err());
    }
}
