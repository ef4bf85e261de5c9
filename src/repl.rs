use std::sync::Arc;

use crate::engine::{execute_batch, ExecutionResult, Shell};
use crate::error::{report, ShellError};
use crate::input::LineSource;
use crate::parser::{BatchReader, Status};

/// Read and run batches until end of input or `exit`.
///
/// Parse errors and failed statements are reported and the loop carries on;
/// only a failure to read input ends it with an error.
pub fn run<S: LineSource>(source: S, shell: &Arc<Shell>) -> Result<(), ShellError> {
    let mut reader = BatchReader::new(source, shell.prompt());

    loop {
        shell.tasks().reap();

        let batch = match reader.next_batch() {
            Ok(batch) => batch,
            Err(e @ ShellError::Input(_)) => return Err(e),
            Err(e) => {
                report(&e);
                continue;
            }
        };

        let status = batch.status;
        if let ExecutionResult::Exit = execute_batch(batch.statements, shell) {
            break;
        }
        if status == Status::Eof {
            break;
        }
    }

    tracing::debug!(outstanding = shell.tasks().outstanding(), "leaving interactive loop");
    Ok(())
}
