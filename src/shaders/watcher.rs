use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use log::*;
use notify::{Event, RecursiveMode, Watcher};

/// editors tend to emit several events per save
const SETTLE_DELAY: Duration = Duration::from_millis(100);

pub struct ShaderChanges {
    #[expect(unused)]
    watcher: notify::RecommendedWatcher,
    receiver: mpsc::Receiver<notify::Result<Event>>,
    source_extension: String,
}

impl ShaderChanges {
    /// blocks until at least one shader source changed,
    /// then returns every relevant event gathered since
    pub fn wait(&mut self) -> anyhow::Result<Vec<Event>> {
        loop {
            let first = self.receiver.recv()?;
            std::thread::sleep(SETTLE_DELAY);

            let events: notify::Result<Vec<Event>> = std::iter::once(first)
                .chain(self.receiver.try_iter())
                .collect();
            let mut events = events?;

            events.retain(|event| is_source_change(event, &self.source_extension));
            if !events.is_empty() {
                return Ok(events);
            }
        }
    }
}

pub fn watch(shaders_source_dir: &Path, source_extension: &str) -> notify::Result<ShaderChanges> {
    let (sender, receiver) = mpsc::channel::<notify::Result<Event>>();

    let mut watcher = notify::recommended_watcher(sender)?;
    watcher.watch(shaders_source_dir, RecursiveMode::Recursive)?;

    Ok(ShaderChanges {
        watcher,
        receiver,
        source_extension: source_extension.to_string(),
    })
}

/// create, modify & remove events touching a shader source file
pub fn is_source_change(event: &Event, source_extension: &str) -> bool {
    let relevant_kind = match event.kind {
        notify::EventKind::Create(_) => true,
        notify::EventKind::Modify(_) => true,
        notify::EventKind::Remove(_) => true,

        notify::EventKind::Access(_) => false,
        notify::EventKind::Any => {
            error!("unexpected notify event: {event:?}");
            false
        }
        notify::EventKind::Other => {
            error!("unexpected notify event: {event:?}");
            false
        }
    };

    relevant_kind
        && event
            .paths
            .iter()
            .any(|path| path.extension().is_some_and(|ext| ext == source_extension))
}
