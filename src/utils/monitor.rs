use std::time::{Duration, Instant};

#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

/// Logs elapsed time and resident memory after each startup phase.
#[cfg(feature = "cli")]
pub struct StartupMonitor {
    system: Option<(System, Pid)>,
    start_time: Instant,
    last_phase: Instant,
    peak_memory_mb: u64,
}

#[cfg(feature = "cli")]
impl StartupMonitor {
    pub fn new(enabled: bool) -> Self {
        let system = if enabled {
            match sysinfo::get_current_pid() {
                Ok(pid) => {
                    let mut system = System::new_with_specifics(RefreshKind::everything());
                    system.refresh_all();
                    Some((system, pid))
                }
                Err(e) => {
                    tracing::warn!("System monitoring unavailable: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let now = Instant::now();
        Self {
            system,
            start_time: now,
            last_phase: now,
            peak_memory_mb: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.system.is_some()
    }

    /// Returns the time spent since the previous phase ended.
    pub fn phase_done(&mut self, phase: &str) -> Duration {
        let elapsed = self.last_phase.elapsed();
        self.last_phase = Instant::now();

        let Some((system, pid)) = self.system.as_mut() else {
            return elapsed;
        };
        system.refresh_all();
        if let Some(process) = system.process(*pid) {
            let memory_mb = process.memory() / 1024 / 1024;
            self.peak_memory_mb = self.peak_memory_mb.max(memory_mb);
            tracing::info!(
                "📊 {} - took {:?}, Memory: {}MB, Peak: {}MB",
                phase,
                elapsed,
                memory_mb,
                self.peak_memory_mb
            );
        }
        elapsed
    }

    pub fn log_final_stats(&self) {
        if self.is_enabled() {
            tracing::info!(
                "📊 Startup finished - Total Time: {:?}, Peak Memory: {}MB",
                self.start_time.elapsed(),
                self.peak_memory_mb
            );
        }
    }
}

// 為非CLI環境提供只計時的實現
#[cfg(not(feature = "cli"))]
pub struct StartupMonitor {
    last_phase: Instant,
}

#[cfg(not(feature = "cli"))]
impl StartupMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self {
            last_phase: Instant::now(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        false
    }

    pub fn phase_done(&mut self, _phase: &str) -> Duration {
        let elapsed = self.last_phase.elapsed();
        self.last_phase = Instant::now();
        elapsed
    }

    pub fn log_final_stats(&self) {}
}
