// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2021 the Posh contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Type definitions for job management.

pub mod fmt;
pub mod id;

#[doc(no_inline)]
pub use nix::sys::wait::WaitStatus;
#[doc(no_inline)]
pub use nix::unistd::Pid;

use crate::semantics::ExitStatus;
use crate::trap::Signal;

/// Outcome of a process that has stopped running, temporarily or for good.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ProcessResult {
    /// The process exited with the given exit status.
    Exited(ExitStatus),
    /// The process was terminated by the given signal.
    Signaled {
        /// Signal that terminated the process
        signal: Signal,
        /// Whether the process dumped core
        core_dump: bool,
    },
    /// The process was stopped by the given signal.
    Stopped(Signal),
}

impl ProcessResult {
    /// Returns whether this result denotes a process that is suspended, as
    /// opposed to one that has terminated.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        matches!(self, ProcessResult::Stopped(_))
    }
}

/// Computes the exit status corresponding to a process result.
///
/// An exited process yields its own exit status. A process that was signaled
/// or stopped yields 384 (`0x180`) plus the signal number, so that `$?` can be
/// used to recover the signal that ended or suspended the process.
impl From<ProcessResult> for ExitStatus {
    fn from(result: ProcessResult) -> ExitStatus {
        match result {
            ProcessResult::Exited(exit_status) => exit_status,
            ProcessResult::Signaled { signal, .. } | ProcessResult::Stopped(signal) => {
                ExitStatus(signal as i32 + 0x180)
            }
        }
    }
}

/// State of a job-controlled process.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ProcessState {
    /// The process is still running.
    Running,
    /// The process has stopped running, temporarily or for good.
    Halted(ProcessResult),
}

impl ProcessState {
    /// Returns a `ProcessState` indicating a process that exited with the
    /// given exit status.
    #[must_use]
    pub fn exited<S: Into<ExitStatus>>(exit_status: S) -> Self {
        ProcessState::Halted(ProcessResult::Exited(exit_status.into()))
    }

    /// Returns a `ProcessState` indicating a process that was stopped by the
    /// given signal.
    #[must_use]
    pub fn stopped(signal: Signal) -> Self {
        ProcessState::Halted(ProcessResult::Stopped(signal))
    }

    /// Returns whether the process is not yet terminated.
    ///
    /// A stopped (but not terminated) process is considered alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        match self {
            ProcessState::Running => true,
            ProcessState::Halted(result) => result.is_stopped(),
        }
    }

    /// Converts this process state into the `WaitStatus` reported for `pid`.
    #[must_use]
    pub fn to_wait_status(self, pid: Pid) -> WaitStatus {
        match self {
            ProcessState::Running => WaitStatus::Continued(pid),
            ProcessState::Halted(ProcessResult::Exited(exit_status)) => {
                WaitStatus::Exited(pid, exit_status.0)
            }
            ProcessState::Halted(ProcessResult::Signaled { signal, core_dump }) => {
                WaitStatus::Signaled(pid, signal, core_dump)
            }
            ProcessState::Halted(ProcessResult::Stopped(signal)) => {
                WaitStatus::Stopped(pid, signal)
            }
        }
    }
}

/// Computes the exit status of a process in the given state.
///
/// A running process has no well-defined exit status yet; this conversion
/// treats it the same as a process that exited with status zero.
impl From<ProcessState> for ExitStatus {
    fn from(state: ProcessState) -> ExitStatus {
        match state {
            ProcessState::Running => ExitStatus::default(),
            ProcessState::Halted(result) => result.into(),
        }
    }
}

/// Set of one or more processes executing a pipeline
///
/// In the current implementation, a job contains the process ID of one child
/// process of the shell. Though there may be more processes involved in the
/// execution of the pipeline, the shell takes care of only one process of the
/// job.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct Job {
    /// Process ID
    pub pid: Pid,

    /// Whether the job is job-controlled.
    ///
    /// If the job is job-controlled, the job process runs in its own process
    /// group.
    pub job_controlled: bool,

    /// Whether the job is owned by the current shell environment.
    ///
    /// A job stops being owned when it is disowned, for example by the
    /// `disown` built-in. An unowned job is not subject to job control
    /// operations performed by the user, though the shell still tracks its
    /// status internally until it terminates.
    pub is_owned: bool,

    /// Current state of the process
    pub state: ProcessState,

    /// Status that has already been reported to the user.
    ///
    /// When the process state changes to match this value, the change is
    /// considered already known and is not reported again in the next job
    /// status report.
    pub expected_status: Option<WaitStatus>,

    /// String representation of this process
    pub name: String,
}

impl Job {
    /// Creates a new job instance.
    ///
    /// This function requires a process ID to initialize the new job. The
    /// other members of the job are defaulted.
    #[must_use]
    pub fn new(pid: Pid) -> Self {
        Job {
            pid,
            job_controlled: false,
            is_owned: true,
            state: ProcessState::Running,
            expected_status: None,
            name: String::new(),
        }
    }

    /// Records that `status` is the next status change to expect for this
    /// job, so that it is not reported again when it is observed.
    pub fn expect(&mut self, status: WaitStatus) {
        self.expected_status = Some(status);
    }
}

/// Indexed collection of jobs.
///
/// A `JobList` only stores jobs and hands out stable indices; it knows
/// nothing about which job is current or previous. See [`JobSet`] for a
/// collection that also tracks that state.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct JobList {
    jobs: Vec<Option<Job>>,
}

impl JobList {
    /// Creates an empty job list.
    #[must_use]
    pub fn new() -> Self {
        JobList::default()
    }

    /// Returns the number of jobs in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.iter().filter(|job| job.is_some()).count()
    }

    /// Returns whether the list contains no jobs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds a job to the list, returning its index.
    ///
    /// The index of a previously removed job may be reused.
    pub fn add(&mut self, job: Job) -> usize {
        if let Some(index) = self.jobs.iter().position(Option::is_none) {
            self.jobs[index] = Some(job);
            index
        } else {
            self.jobs.push(Some(job));
            self.jobs.len() - 1
        }
    }

    /// Returns a reference to the job at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Job> {
        self.jobs.get(index)?.as_ref()
    }

    /// Returns a mutable reference to the job at `index`, if any.
    #[must_use]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Job> {
        self.jobs.get_mut(index)?.as_mut()
    }

    /// Removes and returns the job at `index`, if any.
    pub fn remove(&mut self, index: usize) -> Option<Job> {
        self.jobs.get_mut(index)?.take()
    }

    /// Returns an iterator over the indices and jobs in the list.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (usize, &Job)> {
        self.jobs
            .iter()
            .enumerate()
            .filter_map(|(index, job)| Some((index, job.as_ref()?)))
    }

    /// Returns the index of the job with the given process ID, if any.
    #[must_use]
    pub fn find_by_pid(&self, pid: Pid) -> Option<usize> {
        self.iter().find(|(_, job)| job.pid == pid).map(|(i, _)| i)
    }
}

impl std::ops::Index<usize> for JobList {
    type Output = Job;
    fn index(&self, index: usize) -> &Job {
        self.get(index).expect("no job at the given index")
    }
}

impl std::ops::IndexMut<usize> for JobList {
    fn index_mut(&mut self, index: usize) -> &mut Job {
        self.get_mut(index).expect("no job at the given index")
    }
}

/// Error that may occur in [`JobSet::set_current_job`]
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("no job at the given index")]
pub struct SetCurrentJobError;

/// Collection of jobs, with tracking of the current and previous job and of
/// the most recently started asynchronous command.
///
/// `JobSet` dereferences to [`JobList`], so its indexing, iteration, and
/// membership operations are available directly on a `JobSet`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JobSet {
    list: JobList,
    current_job: Option<usize>,
    previous_job: Option<usize>,
    last_async_pid: Pid,
}

impl Default for JobSet {
    fn default() -> Self {
        JobSet {
            list: JobList::default(),
            current_job: None,
            previous_job: None,
            last_async_pid: Pid::from_raw(0),
        }
    }
}

impl std::ops::Deref for JobSet {
    type Target = JobList;
    fn deref(&self) -> &JobList {
        &self.list
    }
}

impl std::ops::DerefMut for JobSet {
    fn deref_mut(&mut self) -> &mut JobList {
        &mut self.list
    }
}

impl JobSet {
    /// Returns the index of the current job, if any.
    #[must_use]
    pub fn current_job(&self) -> Option<usize> {
        self.current_job
    }

    /// Returns the index of the previous job, if any.
    #[must_use]
    pub fn previous_job(&self) -> Option<usize> {
        self.previous_job
    }

    /// Sets the current job to the job at `index`.
    ///
    /// The previously current job, if any and different from `index`,
    /// becomes the previous job.
    ///
    /// Returns an error without modifying `self` if there is no job at
    /// `index`.
    pub fn set_current_job(&mut self, index: usize) -> Result<(), SetCurrentJobError> {
        if self.list.get(index).is_none() {
            return Err(SetCurrentJobError);
        }
        if self.current_job != Some(index) {
            self.previous_job = self.current_job;
            self.current_job = Some(index);
        }
        Ok(())
    }

    /// Adds a job to the set.
    ///
    /// The added job becomes the current job, and the job that was current
    /// until now (if any) becomes the previous job.
    pub fn add(&mut self, job: Job) -> usize {
        let index = self.list.add(job);
        self.previous_job = self.current_job;
        self.current_job = Some(index);
        index
    }

    /// Updates the state of the job matching the process ID in `status`.
    ///
    /// If the job's new state equals its [expected
    /// status](Job::expected_status), the expectation is cleared. Does
    /// nothing if no job has the reported process ID.
    pub fn update_status(&mut self, status: WaitStatus) {
        let Some(pid) = status.pid() else { return };
        let Some(index) = self.list.find_by_pid(pid) else {
            return;
        };
        let job = &mut self.list[index];
        if job.expected_status == Some(status) {
            job.expected_status = None;
        }
        job.state = match status {
            WaitStatus::Exited(_, exit_status) => ProcessState::exited(exit_status),
            WaitStatus::Signaled(_, signal, core_dump) => {
                ProcessState::Halted(ProcessResult::Signaled { signal, core_dump })
            }
            WaitStatus::Stopped(_, signal) => ProcessState::stopped(signal),
            WaitStatus::Continued(_) => ProcessState::Running,
            WaitStatus::StillAlive | WaitStatus::PtraceEvent(..) | WaitStatus::PtraceSyscall(_) => {
                return;
            }
        };
        if self.current_job != Some(index) {
            self.previous_job = self.current_job;
            self.current_job = Some(index);
        }
    }

    /// Removes jobs for which `f` returns `false`.
    pub fn retain_jobs<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, &Job) -> bool,
    {
        let to_remove: Vec<usize> = self
            .list
            .iter()
            .filter(|&(index, job)| !f(index, job))
            .map(|(index, _)| index)
            .collect();
        for index in to_remove {
            self.list.remove(index);
            if self.current_job == Some(index) {
                self.current_job = None;
            }
            if self.previous_job == Some(index) {
                self.previous_job = None;
            }
        }
    }

    /// Calls `f` with the index and a reference to every job in the set, in
    /// order of index, until `f` returns `false`.
    pub fn report_jobs<F>(&self, mut f: F)
    where
        F: FnMut(usize, &Job) -> bool,
    {
        for (index, job) in self.list.iter() {
            if !f(index, job) {
                break;
            }
        }
    }

    /// Returns the process ID of the most recently executed asynchronous
    /// command.
    ///
    /// This function returns the value that has been set by
    /// [`set_last_async_pid`](Self::set_last_async_pid), or 0 if no value has
    /// been set.
    ///
    /// When expanding the special parameter `$!`, you must use
    /// [`expand_last_async_pid`](Self::expand_last_async_pid) instead of this
    /// function.
    #[must_use]
    pub fn last_async_pid(&self) -> Pid {
        self.last_async_pid
    }

    /// Returns the process ID of the most recently executed asynchronous
    /// command.
    ///
    /// This function is similar to [`last_async_pid`](Self::last_async_pid),
    /// but also updates an internal flag so that the asynchronous command is
    /// not disowned too soon.
    ///
    /// TODO Elaborate on automatic disowning
    pub fn expand_last_async_pid(&mut self) -> Pid {
        // TODO Keep the async process from being disowned.
        self.last_async_pid
    }

    /// Sets the process ID of the most recently executed asynchronous command.
    ///
    /// This function affects the result of
    /// [`last_async_pid`](Self::last_async_pid).
    pub fn set_last_async_pid(&mut self, pid: Pid) {
        self.last_async_pid = pid;
    }

    /// Marks every job as not owned by the current shell environment.
    ///
    /// This is used when the shell environment forks and the child process
    /// keeps no claim on the jobs started by the parent.
    pub fn disown_all(&mut self) {
        for (_, job) in self.list.jobs.iter_mut().enumerate().filter_map(|(i, j)| {
            j.as_mut().map(|job| (i, job))
        }) {
            job.is_owned = false;
        }
    }
}
