//! Standings and name lookup shared by reporting and announcements

use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

use crate::host::{ActorId, ArenaHost};

/// One row of the standings table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub name: String,
    pub lives: u32,
    pub eliminated: bool,
}

/// Display name, or an empty string when the host cannot resolve one
pub fn display_name(host: &dyn ArenaHost, actor: ActorId) -> String {
    match host.display_name(actor) {
        Ok(name) => name,
        Err(err) => {
            debug!(actor = %actor, error = %err, "Display name lookup failed");
            String::new()
        }
    }
}

fn compare(a: &Standing, b: &Standing) -> Ordering {
    a.eliminated
        .cmp(&b.eliminated)
        .then_with(|| b.lives.cmp(&a.lives))
        .then_with(|| a.name.cmp(&b.name))
}

/// Survivors first, then lives descending, then name (ordinal)
pub fn sort_standings(standings: &mut [Standing]) {
    standings.sort_by(compare);
}
