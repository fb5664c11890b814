use std::collections::HashSet;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::layout::{Position, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::config::SessionOptions;
use crate::error::SessionError;
use crate::lineage::{PendingFeedback, apply_revision, record_feedback, start_lineage};
use crate::model::{Analysis, Hypothesis, HypothesisKind, Session, now_timestamp, validate};
use crate::store;
use crate::tui::{Collaborators, RunSummary};

use super::focus::{Bounds, FocusState, Nav, Pane};
use super::keymap::{Command, Dispatcher, KEY_TABLE, ModalKind, Mode, PromptKind};
use super::surface::{GridSink, Region, RenderSurface};
use super::text::wrap;

mod cmd_dispatch;
mod event_loop;
mod jobs;
mod lifecycle;
mod render;
mod runtime;
mod state;
mod status_line;

pub(super) use self::runtime::run;
pub(in crate::tui_shell) use self::state::App;

#[cfg(test)]
#[path = "../tests/tui_shell/app_tests.rs"]
mod tests;
