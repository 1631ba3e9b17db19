//! Run Loop (§4.6): ticks the CPU until halted, with hooks wrapped around
//! (never inside) each tick.

use std::io::{Read, Write};
use std::time::Duration;

use crate::cpu::{Cpu, Fault};

/// Hooks available around each call to [`Cpu::tick`].
#[derive(Default)]
pub struct RunOptions<'a> {
    /// Sleep this long between ticks.
    pub pause: Option<Duration>,
    /// Emit a full state dump after every tick.
    pub verbose: bool,
    /// Called after every tick; the host may use this to block on a
    /// step signal (e.g. waiting for a newline on stdin).
    pub step: Option<&'a mut dyn FnMut()>,
}

/// Runs `cpu` to completion, applying `opts`'s hooks around (never inside)
/// each tick.
pub fn run<R: Read, W: Write>(cpu: &mut Cpu<R, W>, mut opts: RunOptions) -> Result<(), Fault> {
    while cpu.is_running() {
        cpu.tick()?;

        if opts.verbose {
            log::trace!("{}", dump(cpu));
        }

        if let Some(step) = opts.step.as_deref_mut() {
            step();
        }

        if let Some(pause) = opts.pause {
            std::thread::sleep(pause);
        }
    }

    Ok(())
}

/// Formats a single-line snapshot of CPU state, used by the `verbose`
/// hook. This is deliberately not the out-of-scope memory/stack
/// hex-display printer — it is a plain debug line, not a pretty-printed
/// table.
pub fn dump<R, W>(cpu: &Cpu<R, W>) -> String {
    format!(
        "ip={} sp={} cnt={} stack={:?}",
        cpu.ip(),
        cpu.sp(),
        cpu.cnt(),
        cpu.stack()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn runs_until_term() {
        let program = [13, 42, 25]; // push 42, term
        let mut cpu = Cpu::with_io(&program, &[], Cursor::new(Vec::new()), Vec::new());
        run(&mut cpu, RunOptions::default()).unwrap();
        assert!(!cpu.is_running());
        assert_eq!(cpu.stack(), &[42]);
    }

    #[test]
    fn step_hook_runs_once_per_tick() {
        let program = [13, 1, 13, 2, 25]; // push 1, push 2, term
        let mut cpu = Cpu::with_io(&program, &[], Cursor::new(Vec::new()), Vec::new());
        let mut ticks = 0;
        let mut step = || ticks += 1;
        run(
            &mut cpu,
            RunOptions {
                step: Some(&mut step),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(ticks, 3);
    }
}
