//! AppleScript sources sent to the music application, and parsers for
//! what they print back.

use roomcast_domain::playlist::Playlist;
use roomcast_domain::volume::Volume;

/// Quote `value` as an AppleScript string literal.
pub(crate) fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

/// AppleScript list literal of quoted strings.
pub(crate) fn list(values: &[String]) -> String {
    let items: Vec<String> = values.iter().map(|value| quote(value)).collect();
    format!("{{{}}}", items.join(", "))
}

fn tell(application: &str, body: &str) -> String {
    format!("tell application {}\n{body}\nend tell", quote(application))
}

pub(crate) fn select_outputs(application: &str, rooms: &[String]) -> String {
    tell(
        application,
        &format!(
            "set wanted to {}\nrepeat with device in AirPlay devices\nset selected of device to ((name of device) is in wanted)\nend repeat",
            list(rooms)
        ),
    )
}

pub(crate) fn set_volume(application: &str, rooms: &[String], volume: Volume) -> String {
    tell(
        application,
        &format!(
            "set wanted to {}\nrepeat with device in AirPlay devices\nif (name of device) is in wanted then set sound volume of device to {volume}\nend repeat",
            list(rooms)
        ),
    )
}

pub(crate) fn set_shuffle(application: &str, enabled: bool) -> String {
    tell(application, &format!("set shuffle enabled to {enabled}"))
}

pub(crate) fn search_playlists(application: &str, query: &str) -> String {
    tell(
        application,
        &format!(
            "set found to \"\"\nrepeat with p in (every user playlist whose name contains {})\nset found to found & (persistent ID of p) & tab & (name of p) & linefeed\nend repeat\nreturn found",
            quote(query)
        ),
    )
}

pub(crate) fn play_by_id(application: &str, id: &str) -> String {
    tell(
        application,
        &format!("play (first playlist whose persistent ID is {})", quote(id)),
    )
}

pub(crate) fn playlist_name(application: &str, id: &str) -> String {
    tell(
        application,
        &format!(
            "return name of (first playlist whose persistent ID is {})",
            quote(id)
        ),
    )
}

pub(crate) fn current_outputs(application: &str) -> String {
    tell(
        application,
        "set names to {}\nrepeat with device in current AirPlay devices\nset end of names to (name of device)\nend repeat\nset AppleScript's text item delimiters to linefeed\nreturn names as text",
    )
}

pub(crate) fn player_state(application: &str) -> String {
    tell(application, "return player state as text")
}

pub(crate) fn stop(application: &str) -> String {
    tell(application, "stop")
}

/// Parse `id<TAB>name` lines printed by [`search_playlists`].
pub(crate) fn parse_playlists(output: &str) -> Vec<Playlist> {
    output
        .lines()
        .filter_map(|line| {
            let (id, name) = line.split_once('\t')?;
            let (id, name) = (id.trim(), name.trim());
            (!id.is_empty() && !name.is_empty()).then(|| Playlist::new(id, name))
        })
        .collect()
}

/// Parse one room name per line printed by [`current_outputs`].
pub(crate) fn parse_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}
