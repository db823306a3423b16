//! Line-oriented command loop for playing against the engine.
//!
//! Modeled on GTP: each command is one line, optionally preceded by a
//! numeric id. Successful responses start with `=`, failures with `?`, and
//! every response ends with a blank line.
//!
//! ## Commands
//!
//! - `name`, `version`, `list_commands`, `known_command <cmd>`
//! - `clear_board` - start a new game
//! - `play <color> <move>` - play `xy` (add) or `xy-xy` (step)
//! - `genmove <color>` - let the engine move; only its own color
//! - `undo` - take back the last move
//! - `showboard` - print the board
//! - `quit`

use std::io::{self, BufRead, Write};

use crate::config::SearchConfig;
use crate::moves::{parse_move, str_move, Color};
use crate::player::{winner_after, MachinePlayer};

const KNOWN_COMMANDS: &[&str] = &[
    "clear_board",
    "genmove",
    "known_command",
    "list_commands",
    "name",
    "play",
    "quit",
    "showboard",
    "undo",
    "version",
];

pub struct CommandLoop {
    player: MachinePlayer,
}

impl CommandLoop {
    pub fn new(engine_color: Color, config: SearchConfig) -> Self {
        Self {
            player: MachinePlayer::with_config(engine_color, config),
        }
    }

    pub fn player(&self) -> &MachinePlayer {
        &self.player
    }

    /// Read commands from `input` until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),
            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),
            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),
            "known_command" => match args.first() {
                Some(cmd) => {
                    let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                    (true, known.to_string())
                }
                None => (false, "missing argument".to_string()),
            },
            "quit" => (true, String::new()),
            "clear_board" => {
                self.player.reset();
                (true, String::new())
            }
            "showboard" => (true, format!("\n{}", self.player.board())),
            "undo" => {
                if self.player.undo() {
                    (true, String::new())
                } else {
                    (false, "nothing to undo".to_string())
                }
            }
            "play" => {
                let [color, text] = args else {
                    return (false, "usage: play <color> <move>".to_string());
                };
                let color = match color.parse::<Color>() {
                    Ok(c) => c,
                    Err(e) => return (false, e.to_string()),
                };
                let mv = match parse_move(text, color) {
                    Ok(mv) => mv,
                    Err(e) => return (false, e.to_string()),
                };
                let accepted = if color == self.player.color() {
                    self.player.force_move(mv)
                } else {
                    self.player.opponent_move(mv)
                };
                if !accepted {
                    return (false, "illegal move".to_string());
                }
                (true, self.game_over_note(color))
            }
            "genmove" => {
                let Some(color) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let color = match color.parse::<Color>() {
                    Ok(c) => c,
                    Err(e) => return (false, e.to_string()),
                };
                if color != self.player.color() {
                    return (false, format!("engine plays {}", self.player.color()));
                }
                match self.player.choose_move() {
                    Some(mv) => {
                        let note = self.game_over_note(color);
                        (true, format!("{}{note}", str_move(&mv)))
                    }
                    None => (true, "none".to_string()),
                }
            }
            _ => (false, format!("unknown command: {command}")),
        }
    }

    fn game_over_note(&self, mover: Color) -> String {
        match winner_after(self.player.board(), mover) {
            Some(winner) => format!(" ({winner} wins)"),
            None => String::new(),
        }
    }
}

/// Split an optional numeric id off the front of a command line.
fn parse_id(line: &str) -> (Option<u32>, &str) {
    let trimmed = line.trim();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    if end == 0 {
        return (None, trimmed);
    }
    match trimmed[..end].parse::<u32>() {
        Ok(id) => (Some(id), trimmed[end..].trim()),
        Err(_) => (None, trimmed),
    }
}
