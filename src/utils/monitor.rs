use std::time::{Duration, Instant};

#[cfg(feature = "cli")]
use std::sync::atomic::{AtomicU64, Ordering};
#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

/// 單次會議準備的計時器
#[derive(Debug, Clone, Copy)]
pub struct RunTimer {
    pub run_id: u64,
    started: Instant,
}

impl RunTimer {
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct ProcessSample {
    pub cpu_usage: f32,
    pub memory_mb: u64,
    pub memory_percent: f32,
    pub peak_memory_mb: u64,
}

/// 行程資源監控，伺服器生命週期內共用，每個請求各自計時
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    system: Mutex<System>,
    pid: Option<Pid>,
    peak_memory_mb: AtomicU64,
    runs: AtomicU64,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = if enabled {
            match sysinfo::get_current_pid() {
                Ok(pid) => Some(pid),
                Err(e) => {
                    tracing::warn!("⚠️ Unable to resolve current PID, monitoring disabled: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let system = if pid.is_some() {
            System::new_with_specifics(RefreshKind::everything())
        } else {
            System::new()
        };

        Self {
            system: Mutex::new(system),
            pid,
            peak_memory_mb: AtomicU64::new(0),
            runs: AtomicU64::new(0),
            enabled: enabled && pid.is_some(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn start_run(&self) -> RunTimer {
        RunTimer {
            run_id: self.runs.fetch_add(1, Ordering::Relaxed) + 1,
            started: Instant::now(),
        }
    }

    pub fn sample(&self) -> Option<ProcessSample> {
        if !self.enabled {
            return None;
        }

        let pid = self.pid?;
        let mut system = self.system.lock().ok()?;
        system.refresh_all();

        let process = system.process(pid)?;
        let memory_mb = process.memory() / 1024 / 1024;
        let total_mb = system.total_memory() / 1024 / 1024;
        let memory_percent = if total_mb > 0 {
            memory_mb as f32 / total_mb as f32 * 100.0
        } else {
            0.0
        };
        let previous_peak = self.peak_memory_mb.fetch_max(memory_mb, Ordering::Relaxed);

        Some(ProcessSample {
            cpu_usage: process.cpu_usage(),
            memory_mb,
            memory_percent,
            peak_memory_mb: previous_peak.max(memory_mb),
        })
    }

    pub fn log_phase(&self, timer: &RunTimer, phase: &str) {
        if let Some(sample) = self.sample() {
            tracing::info!(
                "📊 Run #{} {} - CPU: {:.1}%, Memory: {}MB ({:.1}%), Elapsed: {:?}",
                timer.run_id,
                phase,
                sample.cpu_usage,
                sample.memory_mb,
                sample.memory_percent,
                timer.elapsed()
            );
        }
    }

    pub fn finish_run(&self, timer: &RunTimer) {
        if let Some(sample) = self.sample() {
            tracing::info!(
                "📊 Run #{} finished in {:?}, peak memory {}MB",
                timer.run_id,
                timer.elapsed(),
                sample.peak_memory_mb
            );
        }
    }
}

// 無 sysinfo 時只保留計時
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor {
    runs: std::sync::atomic::AtomicU64,
}

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        false
    }

    pub fn start_run(&self) -> RunTimer {
        RunTimer {
            run_id: self.runs.fetch_add(1, std::sync::atomic::Ordering::Relaxed) + 1,
            started: Instant::now(),
        }
    }

    pub fn log_phase(&self, _timer: &RunTimer, _phase: &str) {}

    pub fn finish_run(&self, _timer: &RunTimer) {}
}
