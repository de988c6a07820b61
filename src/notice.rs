// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! User-visible warning and error popups.

use chrono::{DateTime, Local};
use std::collections::VecDeque;

pub const EMPTY_DATA_MESSAGE: &str = "No data received from backend!";
pub const FETCH_FAILURE_MESSAGE: &str = "Could not load map data. Check console for details.";

/// Keep at most this many unacknowledged notices
const MAX_NOTICES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

impl NoticeLevel {
    fn title(self) -> &'static str {
        match self {
            NoticeLevel::Warning => "⚠ Warning",
            NoticeLevel::Error => "❌ Error",
        }
    }

    fn color(self) -> egui::Color32 {
        match self {
            NoticeLevel::Warning => egui::Color32::from_rgb(255, 200, 80),
            NoticeLevel::Error => egui::Color32::from_rgb(255, 100, 100),
        }
    }
}

/// A popup waiting for the user to acknowledge it
#[derive(Debug, Clone)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
    /// Disaster identifier of the load that raised it
    pub disaster: String,
    pub raised_at: DateTime<Local>,
}

#[derive(Debug, Default)]
pub struct NoticeQueue {
    notices: VecDeque<Notice>,
    next_id: u64,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: NoticeLevel, disaster: &str, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        self.notices.push_back(Notice {
            id,
            level,
            message: message.into(),
            disaster: disaster.to_string(),
            raised_at: Local::now(),
        });
        while self.notices.len() > MAX_NOTICES {
            self.notices.pop_front();
        }

        id
    }

    /// Empty Data: the backend answered but had no points
    pub fn empty_data(&mut self, disaster: &str) -> u64 {
        self.push(NoticeLevel::Warning, disaster, EMPTY_DATA_MESSAGE)
    }

    /// Fetch Failure: network, HTTP or parse error
    pub fn fetch_failure(&mut self, disaster: &str) -> u64 {
        self.push(NoticeLevel::Error, disaster, FETCH_FAILURE_MESSAGE)
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        if let Some(pos) = self.notices.iter().position(|n| n.id == id) {
            self.notices.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// Render pending notices as centred windows with an OK button.
    /// Returns the ids acknowledged this frame.
    #[must_use]
    pub fn show(&self, ctx: &egui::Context) -> Vec<u64> {
        let mut dismissed = Vec::new();

        for (i, notice) in self.notices.iter().enumerate() {
            let offset = i as f32 * 24.0;
            egui::Window::new(notice.level.title())
                .id(egui::Id::new(("notice", notice.id)))
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(offset, offset))
                .show(ctx, |ui| {
                    ui.label(egui::RichText::new(&notice.message).color(notice.level.color()));
                    ui.label(
                        egui::RichText::new(format!(
                            "{} · {}",
                            notice.disaster,
                            notice.raised_at.format("%H:%M:%S")
                        ))
                        .small()
                        .weak(),
                    );
                    ui.add_space(4.0);
                    if ui.button("OK").clicked() {
                        dismissed.push(notice.id);
                    }
                });
        }

        dismissed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_data_is_warning() {
        let mut queue = NoticeQueue::new();
        queue.empty_data("fire");

        let notice = queue.iter().next().unwrap();
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.message, EMPTY_DATA_MESSAGE);
        assert_eq!(notice.disaster, "fire");
    }

    #[test]
    fn test_dismiss() {
        let mut queue = NoticeQueue::new();
        let first = queue.fetch_failure("flood");
        let second = queue.fetch_failure("storm");

        assert!(queue.dismiss(first));
        assert!(!queue.dismiss(first));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.iter().next().unwrap().id, second);
    }

    #[test]
    fn test_queue_is_bounded() {
        let mut queue = NoticeQueue::new();
        for _ in 0..20 {
            queue.fetch_failure("fire");
        }
        assert_eq!(queue.len(), MAX_NOTICES);
        assert_eq!(queue.iter().next().unwrap().id, 12);
    }
}
