use std::fmt::Display;

use log::*;

use super::toolchain::{Reported, ToolchainFailure};

/// logs compiler diagnostics if there are any
/// never fails; whether the step failed is up to the caller
pub fn report_diagnostics(context: impl Display, diagnostics: Option<&str>) {
    let Some(text) = diagnostics.map(str::trim_end) else {
        return;
    };
    if text.trim().is_empty() {
        return;
    }

    warn!("{context}:\n{text}");
}

impl<T> Reported<T> {
    /// surfaces the diagnostics, then hands back the outcome
    pub fn surface(self, context: impl Display) -> Result<T, ToolchainFailure> {
        report_diagnostics(&context, self.diagnostics.as_deref());
        if let Err(failure) = &self.result {
            error!("{context} failed: {failure}");
        }
        self.result
    }
}
