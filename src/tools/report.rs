use std::fmt::Arguments;

use log::Level;

/// Receives progress and statistics from the codecs.
///
/// The codecs never reach for the global logger themselves. Callers that want
/// diagnostics pass a reporter in; everyone else uses [`NoReport`].
pub trait Report {
    /// Reports one message at the given level.
    fn report(&mut self, level: Level, msg: Arguments<'_>);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoReport;

impl Report for NoReport {
    fn report(&mut self, _level: Level, _msg: Arguments<'_>) {}
}

/// Forwards messages to the `log` facade, tagged with the codec module as target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReport;

impl Report for LogReport {
    fn report(&mut self, level: Level, msg: Arguments<'_>) {
        log::log!(target: "wordpack::codec", level, "{}", msg);
    }
}

/// Keeps every message. Handy in tests and for callers that print their own summaries.
impl Report for Vec<(Level, String)> {
    fn report(&mut self, level: Level, msg: Arguments<'_>) {
        self.push((level, msg.to_string()));
    }
}
