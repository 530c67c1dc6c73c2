//! Terminal rendering of views and notifications.

use colored::Colorize;
use seedline_application::{NotificationQueue, ShownNotification};
use seedline_core::catalog::{NodeInfo, SharedFile};
use seedline_core::notification::NotificationKind;

fn kind_of(shown: &ShownNotification) -> Option<NotificationKind> {
    let class = shown.notification.style_class.as_deref()?;
    [
        NotificationKind::Success,
        NotificationKind::Error,
        NotificationKind::Info,
        NotificationKind::Warning,
    ]
    .into_iter()
    .find(|kind| kind.style_class() == class)
}

/// Prints every notification still in the queue.
pub fn notifications(queue: &NotificationQueue) {
    for shown in queue.snapshot() {
        let header = shown.notification.header.clone().unwrap_or_default();
        let line = format!("{} {}", header, shown.notification.body);
        let line = match kind_of(&shown) {
            Some(NotificationKind::Success) => line.green(),
            Some(NotificationKind::Error) => line.red(),
            Some(NotificationKind::Warning) => line.yellow(),
            Some(NotificationKind::Info) => line.blue(),
            None => line.normal(),
        };
        eprintln!("{}", line);
    }
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn files(items: &[SharedFile]) {
    if items.is_empty() {
        println!("{}", "No files.".dimmed());
        return;
    }
    println!("{:<48} {:>12} {:>8}", "FILENAME".bold(), "SIZE".bold(), "SEEDS".bold());
    for file in items {
        println!(
            "{:<48} {:>12} {:>8}",
            file.filename,
            or_dash(file.size),
            or_dash(file.seeders)
        );
    }
}

pub fn nodes(items: &[NodeInfo]) {
    if items.is_empty() {
        println!("{}", "No connected nodes.".dimmed());
        return;
    }
    println!("{:<24} {:<24} {:>6}", "NODE".bold(), "HOST".bold(), "PORT".bold());
    for node in items {
        let id = node
            .node_id
            .as_ref()
            .map(|id| id.as_str().map(str::to_string).unwrap_or_else(|| id.to_string()));
        println!(
            "{:<24} {:<24} {:>6}",
            or_dash(id),
            or_dash(node.host.clone()),
            or_dash(node.port)
        );
    }
}
