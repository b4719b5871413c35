//! Terminal stand-ins for the chat application's collaborators.

use std::{fs, io, path::PathBuf, sync::Mutex, time::Duration};

use anyhow::{Context, anyhow};

use realworld_weather_core::{Notifier, Severity, TextField, WeatherDisplay, WeatherSnapshot};

/// Notifications go to stderr so stdout stays clean for piping.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, severity: Severity, message: &str, _duration: Option<Duration>) {
        for (i, line) in message.lines().enumerate() {
            if i == 0 {
                eprintln!("[{severity}] {line}");
            } else {
                eprintln!("    {line}");
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct TerminalDisplay;

impl WeatherDisplay for TerminalDisplay {
    fn render(&self, snapshot: Option<&WeatherSnapshot>, use_celsius: bool) {
        let Some(s) = snapshot else {
            println!("No weather data yet. Run `rwweather fetch`.");
            return;
        };

        println!("{}", s.location_name);
        println!("  Condition:   {}", s.condition);
        println!("  Temperature: {}", s.temperature_label(use_celsius));
        println!("  Humidity:    {}%", s.humidity);
        println!("  Wind:        {}", s.wind_label(use_celsius));
        println!("  Updated:     {}", s.timestamp);
    }
}

/// Author's note kept in a plain text file.
#[derive(Debug)]
pub struct NoteFile {
    path: PathBuf,
}

impl NoteFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TextField for NoteFile {
    fn read(&self) -> anyhow::Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e).with_context(|| {
                format!("Failed to read author's note: {}", self.path.display())
            }),
        }
    }

    fn write(&self, text: String) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), error = %e, "failed to create note directory");
                return;
            }
        }
        if let Err(e) = fs::write(&self.path, text) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write author's note");
        }
    }
}

/// Compose box draft held in memory for the duration of one command.
#[derive(Debug, Default)]
pub struct Draft(Mutex<String>);

impl Draft {
    pub fn new(text: String) -> Self {
        Self(Mutex::new(text))
    }
}

impl TextField for Draft {
    fn read(&self) -> anyhow::Result<String> {
        self.0
            .lock()
            .map(|t| t.clone())
            .map_err(|_| anyhow!("compose draft lock poisoned"))
    }

    fn write(&self, text: String) {
        if let Ok(mut t) = self.0.lock() {
            *t = text;
        }
    }
}
