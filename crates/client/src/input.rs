//! Scripted input source.
use std::collections::VecDeque;

use anyhow::{Context, Result, bail};
use game_core::{Button, InputEvent};

/// Button presses to feed the game, one entry per tick.
///
/// The plan is a comma separated list. Each entry is a button name (`a`,
/// `up`, `start`, ...) or `-` for a tick without input, optionally prefixed
/// with a repeat count: `3*-,right,-,a`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputPlan {
    ticks: VecDeque<Option<Button>>,
}

impl InputPlan {
    pub fn parse(text: &str) -> Result<Self> {
        let mut ticks = VecDeque::new();
        for entry in text.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (count, token) = match entry.split_once('*') {
                Some((count, token)) => {
                    let count: usize = count
                        .trim()
                        .parse()
                        .with_context(|| format!("invalid repeat count in `{entry}`"))?;
                    (count, token.trim())
                }
                None => (1, entry),
            };
            let button = match token {
                "-" => None,
                name => match name.parse::<Button>() {
                    Ok(button) => Some(button),
                    Err(_) => bail!("unknown button `{name}` in `{entry}`"),
                },
            };
            ticks.extend(std::iter::repeat_n(button, count));
        }
        Ok(Self { ticks })
    }

    /// Events for the next tick. Empty once the plan is exhausted.
    pub fn next_tick(&mut self) -> Vec<InputEvent> {
        match self.ticks.pop_front() {
            Some(Some(button)) => vec![InputEvent::press(button)],
            _ => Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.ticks.is_empty()
    }
}
