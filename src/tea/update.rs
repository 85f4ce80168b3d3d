//! Pure update function for the TEA (The Elm Architecture) pattern.
//!
//! The update function takes a model and a message, mutates the model,
//! and returns a list of commands to execute.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::Config;
use crate::content::SectionId;
use crate::typewriter::Phase;
use crate::ui::CHROME_HEIGHT;
use crate::{flog, flog_debug, flog_warn};

use super::command::Command;
use super::message::Message;
use super::model::{Model, Notification, NotificationLevel};

/// Helper to set an error notification and mark model as dirty.
fn set_error(model: &mut Model, message: String) {
    flog_warn!("UI Error: {}", message);
    model.notification = Some(Notification {
        level: NotificationLevel::Error,
        message,
    });
    model.dirty = true;
}

fn set_info(model: &mut Model, message: String) {
    model.notification = Some(Notification {
        level: NotificationLevel::Info,
        message,
    });
    model.dirty = true;
}

/// Pure update function: Model + Message → Commands
///
/// All I/O happens via the returned Commands; the function only touches the
/// model.
pub fn update(model: &mut Model, msg: Message) -> Vec<Command> {
    let mut cmds = Vec::new();

    match msg {
        Message::Key(key) => {
            model.notification = None; // Clear notification on any key press
            model.dirty = true; // Keyboard input always triggers render
            update_keys(model, key, &mut cmds);
        }

        Message::Resize(width, height) => {
            let width = width as usize;
            model.viewport.height = height.saturating_sub(CHROME_HEIGHT) as usize;
            if width != model.width {
                flog_debug!("Message::Resize width {} -> {}", model.width, width);
                model.width = width;
                model.relayout();
            }
            model.viewport.clamp_offset(model.total_rows());
            model.dirty = true;
            emit_visibility(model, &mut cmds);
        }

        Message::TypewriterFrame {
            text,
            word_index,
            phase,
        } => {
            model.typed = text;
            model.word_index = word_index;
            model.phase = phase;
            model.dirty = true;
        }

        Message::CounterFrame {
            generation,
            index,
            value,
            done,
        } => {
            if generation != model.counter_generation {
                flog_debug!(
                    "Dropping stale counter frame gen={} current={}",
                    generation,
                    model.counter_generation
                );
            } else if let Some(slot) = model.counters.get_mut(index) {
                slot.value = value;
                slot.started = true;
                slot.done = done;
                model.dirty = true;
            }
        }

        Message::ConfigReloaded(config) => {
            apply_config(model, *config, &mut cmds);
        }

        Message::ConfigRejected(err) => {
            set_error(model, format!("Config not reloaded: {}", err));
        }
    }

    cmds
}

fn update_keys(model: &mut Model, key: KeyEvent, cmds: &mut Vec<Command>) {
    let total = model.total_rows();
    let page = model.viewport.height.max(1) as isize;
    let before = model.viewport.offset;

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            cmds.push(Command::Quit);
        }

        KeyCode::Char('q') | KeyCode::Esc => {
            cmds.push(Command::Quit);
        }

        KeyCode::Char('j') | KeyCode::Down => model.viewport.scroll_by(1, total),
        KeyCode::Char('k') | KeyCode::Up => model.viewport.scroll_by(-1, total),
        KeyCode::PageDown | KeyCode::Char(' ') => model.viewport.scroll_by(page, total),
        KeyCode::PageUp => model.viewport.scroll_by(-page, total),
        KeyCode::Char('g') | KeyCode::Home => model.viewport.scroll_to(0, total),
        KeyCode::Char('G') | KeyCode::End => model.viewport.scroll_to(usize::MAX, total),

        KeyCode::Tab => {
            if let Some(row) = model.page.next_anchor(model.viewport.offset) {
                model.viewport.scroll_to(row, total);
            }
        }

        KeyCode::BackTab => {
            if let Some(row) = model.page.prev_anchor(model.viewport.offset) {
                model.viewport.scroll_to(row, total);
            }
        }

        KeyCode::Char(c @ '1'..='7') => {
            let index = (c as usize) - ('1' as usize);
            jump_to(model, SectionId::NAV[index]);
        }

        KeyCode::Char('p') => jump_to(model, SectionId::Projects),
        KeyCode::Char('c') => jump_to(model, SectionId::Contact),

        KeyCode::Char('?') => {
            model.show_keymap = !model.show_keymap;
        }

        _ => {}
    }

    if model.viewport.offset != before {
        emit_visibility(model, cmds);
    }
}

fn jump_to(model: &mut Model, section: SectionId) {
    if let Some(row) = model.page.anchor(section) {
        let total = model.total_rows();
        model.viewport.scroll_to(row, total);
    }
}

/// Push a `NotifyVisibility` for every counter whose visibility flipped.
fn emit_visibility(model: &mut Model, cmds: &mut Vec<Command>) {
    for (index, visible) in model.observer.update(model.viewport) {
        flog_debug!("Counter {} visible={}", index, visible);
        cmds.push(Command::NotifyVisibility { index, visible });
    }
}

fn apply_config(model: &mut Model, config: Config, cmds: &mut Vec<Command>) {
    if config == model.config {
        flog_debug!("Config reloaded without changes");
        return;
    }

    let typewriter_changed = config.typewriter != model.config.typewriter;
    let counters_changed = config.counters != model.config.counters;
    flog!(
        "Config reloaded: typewriter_changed={} counters_changed={}",
        typewriter_changed,
        counters_changed
    );

    if typewriter_changed {
        model.typed.clear();
        model.word_index = 0;
        model.phase = Phase::Typing;
        cmds.push(Command::ReconfigureTypewriter(config.typewriter.clone()));
    }

    if counters_changed {
        let generation = model.reset_counters(&config.counters);
        cmds.push(Command::RespawnCounters {
            generation,
            counters: config.counters.clone(),
        });
    }

    model.config = config;
    model.relayout();
    emit_visibility(model, cmds);
    set_info(model, "Config reloaded".to_string());
}
