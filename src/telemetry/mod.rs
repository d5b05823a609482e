//! @acp:module "Telemetry"
//! @acp:summary "Opt-in preference prompt and post-run analytics events"
//! @acp:domain cli
//! @acp:layer service
//!
//! The preference is asked once and stored permanently. Events are queued
//! in memory and flushed at exit; nothing leaves the machine unless the
//! user opted in and the binary was built with an Amplitude key.

use chrono::Utc;
use console::style;
use serde::Serialize;
use serde_json::{Map, Value};
use sysinfo::System;

use crate::config::{keys, JsonFileStore};
use crate::error::Result;
use crate::interactive::Prompter;

const AMPLITUDE_ENDPOINT: &str = "https://api2.amplitude.com/2/httpapi";

/// Compiled-in analytics key
pub fn amplitude_api_key() -> Option<&'static str> {
    option_env!("ACLI_AMPLITUDE_KEY").filter(|k| !k.is_empty())
}

/// Stored preference, `None` when never asked
pub fn telemetry_preference(store: &JsonFileStore) -> Result<Option<bool>> {
    Ok(store.get(keys::SEND_TELEMETRY)?.and_then(|v| v.as_bool()))
}

pub fn set_telemetry_preference(store: &JsonFileStore, enabled: bool) -> Result<()> {
    store.set(keys::SEND_TELEMETRY, Value::Bool(enabled))
}

/// @acp:summary "Ask for the telemetry preference on the first interactive run"
///
/// Returns the preference now in effect.
pub fn check_and_prompt_preference(
    store: &JsonFileStore,
    prompter: &dyn Prompter,
    interactive: bool,
) -> Result<Option<bool>> {
    if let Some(pref) = telemetry_preference(store)? {
        return Ok(Some(pref));
    }
    if !interactive {
        return Ok(None);
    }

    println!("We strive to give you the best tools for development.");
    println!("You can really help us improve by sharing anonymous performance and usage data.");
    let pref = prompter.confirm(
        "Would you like to share anonymous performance usage and data?",
        true,
    )?;
    set_telemetry_preference(store, pref)?;

    if pref {
        println!("{} Awesome! Thank you for helping!", style("✓").green());
    } else {
        println!("Ok, no data will be collected and shared with us.");
        println!("We take privacy seriously.");
        println!(
            "If you change your mind, run {}.",
            style("acli telemetry").bold()
        );
    }
    Ok(Some(pref))
}

/// Host operating system as reported in analytics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OsInfo {
    pub family: String,
    pub name: String,
    pub version: String,
}

impl OsInfo {
    pub fn detect() -> Self {
        Self::from_parts(System::name(), System::os_version())
    }

    /// Missing values are reported as `unknown`
    fn from_parts(name: Option<String>, version: Option<String>) -> Self {
        let known = |v: Option<String>| {
            v.map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "unknown".to_string())
        };
        Self {
            family: std::env::consts::FAMILY.to_string(),
            name: known(name),
            version: known(version),
        }
    }
}

/// @acp:summary "Properties of the 'Ran command' event"
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandEvent {
    pub exit_code: i32,
    pub arguments: Map<String, Value>,
    pub options: Map<String, Value>,
    pub app_version: String,
    pub os_family: String,
    pub os_name: String,
    pub os_version: String,
}

impl CommandEvent {
    pub fn new(
        exit_code: i32,
        arguments: Map<String, Value>,
        options: Map<String, Value>,
        os: &OsInfo,
    ) -> Self {
        Self {
            exit_code,
            arguments,
            options,
            app_version: crate::VERSION.to_string(),
            os_family: os.family.clone(),
            os_name: os.name.clone(),
            os_version: os.version.clone(),
        }
    }
}

/// Option ids whose values are never reported
const MASKED_OPTIONS: [&str; 2] = ["secret", "key"];

/// @acp:summary "Split a parsed invocation into argument and option maps"
///
/// `command` is the root clap command the matches were produced by.
/// Positional values of the subcommand land in `arguments` (together with
/// the subcommand name); everything else lands in `options`.
pub fn invocation_properties(
    command: &clap::Command,
    matches: &clap::ArgMatches,
) -> (Map<String, Value>, Map<String, Value>) {
    let mut arguments = Map::new();
    let mut options = Map::new();

    collect_values(command, matches, &mut arguments, &mut options);
    if let Some((name, sub_matches)) = matches.subcommand() {
        arguments.insert("command".to_string(), Value::String(name.to_string()));
        if let Some(sub_command) = command.find_subcommand(name) {
            collect_values(sub_command, sub_matches, &mut arguments, &mut options);
        }
    }

    (arguments, options)
}

fn collect_values(
    command: &clap::Command,
    matches: &clap::ArgMatches,
    arguments: &mut Map<String, Value>,
    options: &mut Map<String, Value>,
) {
    for arg in command.get_arguments() {
        let id = arg.get_id().as_str();
        let Ok(Some(raw)) = matches.try_get_raw(id) else {
            continue;
        };
        let mut values: Vec<Value> = raw
            .map(|v| Value::String(v.to_string_lossy().into_owned()))
            .collect();
        if MASKED_OPTIONS.contains(&id) {
            values = vec![Value::String("***".to_string())];
        }
        let value = if values.len() == 1 {
            values.remove(0)
        } else {
            Value::Array(values)
        };

        if arg.is_positional() {
            arguments.insert(id.to_string(), value);
        } else {
            options.insert(id.to_string(), value);
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct AmplitudeEvent {
    event_type: String,
    device_id: String,
    time: i64,
    insert_id: String,
    app_version: String,
    platform: String,
    os_name: String,
    os_version: String,
    event_properties: Value,
}

/// @acp:summary "In-memory analytics queue"
pub struct Telemetry {
    enabled: bool,
    api_key: Option<String>,
    device_id: String,
    queue: Vec<AmplitudeEvent>,
}

impl Telemetry {
    pub fn new(enabled: bool, api_key: Option<String>, device_id: String) -> Self {
        Self {
            enabled,
            api_key,
            device_id,
            queue: Vec::new(),
        }
    }

    /// @acp:summary "Build from the acli datastore, creating a device id if needed"
    pub fn from_store(store: &JsonFileStore) -> Result<Self> {
        let enabled = telemetry_preference(store)?.unwrap_or(false);
        let device_id = match store.get_string(keys::DEVICE_ID)? {
            Some(id) => id,
            None if enabled => {
                let id = uuid::Uuid::new_v4().to_string();
                store.set(keys::DEVICE_ID, Value::String(id.clone()))?;
                id
            }
            None => String::new(),
        };
        Ok(Self::new(
            enabled,
            amplitude_api_key().map(str::to_string),
            device_id,
        ))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled && self.api_key.is_some()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Queue an event; dropped when telemetry is off
    pub fn queue_event(&mut self, event_type: &str, properties: &CommandEvent) {
        if !self.is_enabled() {
            return;
        }
        let event_properties = match serde_json::to_value(properties) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!("Could not serialize telemetry event: {}", e);
                return;
            }
        };
        self.queue.push(AmplitudeEvent {
            event_type: event_type.to_string(),
            device_id: self.device_id.clone(),
            time: Utc::now().timestamp_millis(),
            insert_id: uuid::Uuid::new_v4().to_string(),
            app_version: properties.app_version.clone(),
            platform: properties.os_family.clone(),
            os_name: properties.os_name.clone(),
            os_version: properties.os_version.clone(),
            event_properties,
        });
    }

    /// @acp:summary "Send queued events; failures are logged and swallowed"
    pub fn flush(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        let Some(api_key) = self.api_key.as_deref() else {
            self.queue.clear();
            return;
        };

        let body = serde_json::json!({
            "api_key": api_key,
            "events": self.queue,
        });
        match ureq::post(AMPLITUDE_ENDPOINT).send_json(body) {
            Ok(_) => tracing::debug!("Sent {} telemetry event(s)", self.queue.len()),
            Err(e) => tracing::debug!("Telemetry upload failed: {}", e),
        }
        self.queue.clear();
    }
}
