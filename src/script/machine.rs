use std::collections::BTreeMap;
use std::sync::mpsc::{Receiver, SyncSender};

use regex::Regex;

use crate::automaton::{Automaton, StateChange};
use crate::script::config::{ScriptConfig, ScriptError};

/// A compiled script, ready to run against the output bus.
pub struct ScriptMachine {
    states: BTreeMap<String, Vec<Transition>>,
    current: String,
}

struct Transition {
    matcher: Matcher,
    to: Option<String>,
    send: Option<String>,
}

enum Matcher {
    Literal(String),
    Regex(Regex),
}

impl Matcher {
    fn matches(&self, line: &str) -> bool {
        match self {
            Matcher::Literal(expected) => line == expected,
            Matcher::Regex(pattern) => pattern.is_match(line),
        }
    }
}

impl ScriptMachine {
    pub fn new(config: &ScriptConfig) -> Result<Self, ScriptError> {
        config.validate()?;

        let mut states = BTreeMap::new();
        for (name, state) in &config.states {
            let mut transitions = Vec::with_capacity(state.transitions.len());
            for transition in &state.transitions {
                // validate() guarantees exactly one matcher and that the
                // regex compiles.
                let matcher = match (&transition.literal, &transition.regex) {
                    (Some(literal), None) => Matcher::Literal(literal.clone()),
                    (None, Some(pattern)) => Matcher::Regex(
                        Regex::new(pattern).map_err(|err| ScriptError::ValidationError {
                            message: format!("state '{name}': invalid regex: {err}"),
                        })?,
                    ),
                    _ => {
                        return Err(ScriptError::ValidationError {
                            message: format!("state '{name}': ambiguous transition matcher"),
                        })
                    }
                };
                transitions.push(Transition {
                    matcher,
                    to: transition.to.clone(),
                    send: transition.send.clone(),
                });
            }
            states.insert(name.clone(), transitions);
        }

        Ok(Self {
            states,
            current: config.initial_state.clone(),
        })
    }

    /// Feeds one output line through the machine. First matching
    /// transition in the current state wins.
    fn observe(&mut self, line: &str) -> Option<String> {
        let transitions = self.states.get(&self.current)?;
        for transition in transitions {
            if !transition.matcher.matches(line) {
                continue;
            }
            let command = transition.send.clone();
            if let Some(to) = &transition.to {
                tracing::debug!(from = %self.current, to = %to, "script transition");
                self.current = to.clone();
            }
            return command;
        }
        None
    }
}

impl Automaton for ScriptMachine {
    fn run(mut self: Box<Self>, lines: Receiver<String>, events: SyncSender<StateChange>) {
        for line in lines {
            if let Some(command) = self.observe(&line) {
                if events.send(StateChange { command }).is_err() {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(toml: &str) -> ScriptMachine {
        ScriptMachine::new(&toml::from_str(toml).unwrap()).unwrap()
    }

    #[test]
    fn literal_match_emits_command_and_moves() {
        let mut m = machine(
            r#"
            initial_state = "waiting"
            [states.waiting]
            transitions = [{ literal = "READY", send = "GO", to = "running" }]
            [states.running]
            transitions = [{ literal = "DONE", send = "quit" }]
        "#,
        );

        assert_eq!(m.observe("READY"), Some("GO".to_string()));
        assert_eq!(m.current, "running");
        // "READY" means nothing in the new state.
        assert_eq!(m.observe("READY"), None);
        assert_eq!(m.observe("DONE"), Some("quit".to_string()));
        assert_eq!(m.current, "running");
    }

    #[test]
    fn regex_matches_anywhere_in_line() {
        let mut m = machine(
            r#"
            initial_state = "s"
            [states.s]
            transitions = [{ regex = "level (up|down)", send = "ack" }]
        "#,
        );

        assert_eq!(m.observe("12:00 level up detected"), Some("ack".to_string()));
        assert_eq!(m.observe("level sideways"), None);
    }

    #[test]
    fn first_matching_transition_wins() {
        let mut m = machine(
            r#"
            initial_state = "s"
            [states.s]
            transitions = [
                { regex = "^map: ", send = "first" },
                { regex = "map",    send = "second" },
            ]
        "#,
        );

        assert_eq!(m.observe("map: de_dust2"), Some("first".to_string()));
        assert_eq!(m.observe("loading map"), Some("second".to_string()));
    }

    #[test]
    fn transition_without_command_still_moves() {
        let mut m = machine(
            r#"
            initial_state = "a"
            [states.a]
            transitions = [{ literal = "next", to = "b" }]
            [states.b]
            transitions = [{ literal = "fire", send = "boom" }]
        "#,
        );

        assert_eq!(m.observe("next"), None);
        assert_eq!(m.observe("fire"), Some("boom".to_string()));
    }

    #[test]
    fn runs_as_automaton_over_buses() {
        use crate::bus;

        let m = machine(
            r#"
            initial_state = "waiting"
            [states.waiting]
            transitions = [{ literal = "READY", send = "GO", to = "done" }]
            [states.done]
        "#,
        );

        let (line_tx, line_rx) = bus::output_bus();
        let (state_tx, state_rx) = bus::state_change_bus();
        let handle = std::thread::spawn(move || Box::new(m).run(line_rx, state_tx));

        line_tx.send("noise".to_string()).unwrap();
        line_tx.send("READY".to_string()).unwrap();
        drop(line_tx);
        handle.join().unwrap();

        let events: Vec<StateChange> = state_rx.into_iter().collect();
        assert_eq!(
            events,
            vec![StateChange {
                command: "GO".to_string()
            }]
        );
    }
}
