//! Flag and environment key helpers shared by the config sections.

use clap::{Arg, ArgAction, ArgMatches};

/// Flag name for `name` under `prefix` (`server.listenuri` or `listenuri`).
pub fn key(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

/// Environment variable bound to `name` under `prefix` (`SERVER_LISTENURI`).
pub fn env_key(prefix: &str, name: &str) -> String {
    key(prefix, name)
        .chars()
        .map(|c| match c {
            '.' | '-' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

pub(crate) fn string_arg(prefix: &str, name: &str, default: &str, help: &'static str) -> Arg {
    let id = key(prefix, name);
    let arg = Arg::new(id.clone())
        .long(id)
        .env(env_key(prefix, name))
        .action(ArgAction::Set)
        .help(help);
    if default.is_empty() {
        arg
    } else {
        arg.default_value(default.to_string())
    }
}

pub(crate) fn list_arg(prefix: &str, name: &str, default: &[String], help: &'static str) -> Arg {
    let id = key(prefix, name);
    let arg = Arg::new(id.clone())
        .long(id)
        .env(env_key(prefix, name))
        .action(ArgAction::Append)
        .value_delimiter(',')
        .help(help);
    if default.is_empty() {
        arg
    } else {
        arg.default_values(default.to_vec())
    }
}

pub(crate) fn flag_arg(prefix: &str, name: &str, default: bool, help: &'static str) -> Arg {
    let id = key(prefix, name);
    Arg::new(id.clone())
        .long(id)
        .env(env_key(prefix, name))
        .action(ArgAction::SetTrue)
        .default_value(if default { "true" } else { "false" })
        .help(help)
}

pub(crate) fn number_arg<T>(prefix: &str, name: &str, default: T, help: &'static str) -> Arg
where
    T: ToString + std::str::FromStr + Clone + Send + Sync + 'static,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let id = key(prefix, name);
    Arg::new(id.clone())
        .long(id)
        .env(env_key(prefix, name))
        .action(ArgAction::Set)
        .value_parser(|s: &str| s.trim().parse::<T>())
        .default_value(default.to_string())
        .help(help)
}

pub(crate) fn get_string(matches: &ArgMatches, prefix: &str, name: &str) -> Option<String> {
    matches
        .try_get_one::<String>(&key(prefix, name))
        .ok()
        .flatten()
        .cloned()
}

pub(crate) fn get_list(matches: &ArgMatches, prefix: &str, name: &str) -> Option<Vec<String>> {
    matches
        .try_get_many::<String>(&key(prefix, name))
        .ok()
        .flatten()
        .map(|values| values.filter(|v| !v.is_empty()).cloned().collect())
}

pub(crate) fn get_flag(matches: &ArgMatches, prefix: &str, name: &str) -> Option<bool> {
    matches
        .try_get_one::<bool>(&key(prefix, name))
        .ok()
        .flatten()
        .copied()
}

pub(crate) fn get_number<T>(matches: &ArgMatches, prefix: &str, name: &str) -> Option<T>
where
    T: Clone + Send + Sync + 'static,
{
    matches
        .try_get_one::<T>(&key(prefix, name))
        .ok()
        .flatten()
        .cloned()
}
