//! Process snapshot adapter backed by `sysinfo`.

use sysinfo::{System, Users};

use super::{ProcessLister, ProcessRecord, Reading, SampleError};

pub struct SysinfoProcessLister {
    system: System,
    users: Users,
}

impl SysinfoProcessLister {
    pub fn new() -> Self {
        Self {
            system: System::new(),
            users: Users::new_with_refreshed_list(),
        }
    }
}

impl Default for SysinfoProcessLister {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessLister for SysinfoProcessLister {
    fn snapshot(&mut self) -> Result<Vec<ProcessRecord>, SampleError> {
        self.system.refresh_processes();

        // sysinfo reports enumeration failure as an empty table rather than
        // an error; at least this process must always be visible.
        if self.system.processes().is_empty() {
            return Err(SampleError::Enumeration(
                "process table is empty".to_string(),
            ));
        }

        let records = self
            .system
            .processes()
            .values()
            .map(|p| {
                let username = p
                    .user_id()
                    .and_then(|uid| self.users.get_user_by_id(uid))
                    .map(|u| u.name().to_string());

                let cmdline = if p.cmd().is_empty() {
                    None
                } else {
                    Some(p.cmd().join(" "))
                };

                ProcessRecord {
                    pid: p.pid().as_u32(),
                    name: p.name().to_string(),
                    username: username.into(),
                    cmdline: cmdline.into(),
                    status: Reading::Value(p.status().to_string()),
                    cpu_percent: Reading::Value(f64::from(p.cpu_usage())),
                    memory_bytes: Reading::Value(p.memory()),
                }
            })
            .collect();

        Ok(records)
    }
}
