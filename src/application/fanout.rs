//! Fan-out runs - broadcast and member-add over a scanned group
//!
//! A run joins a group through an invite code, reads its participants, performs
//! one action per participant with a fixed delay between actions, and leaves
//! the group again when it was not a member before the run. Every await
//! inside the run is bounded by one wall-clock deadline; the leave step runs
//! after the bounded part on every exit path.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio::time::{sleep, timeout_at, Instant};

use crate::application::errors::GatewayError;
use crate::domain::entities::{same_user, Outbound};
use crate::domain::traits::MessagingGateway;
use crate::infrastructure::config::FanOutConfig;

const INVITE_HOST: &str = "chat.whatsapp.com/";

/// Extract the invite code from `https://chat.whatsapp.com/<code>` or a bare code
pub fn parse_invite_code(link: &str) -> Option<String> {
    let link = link.trim();
    let code = match link.find(INVITE_HOST) {
        Some(pos) => &link[pos + INVITE_HOST.len()..],
        None => link,
    };
    let code = code.split(['?', '/']).next().unwrap_or_default();
    if !code.is_empty() && code.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(code.to_string())
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FanOutLimits {
    pub deadline: Duration,
    pub progress_every: u32,
}

impl From<&FanOutConfig> for FanOutLimits {
    fn from(config: &FanOutConfig) -> Self {
        Self {
            deadline: Duration::from_secs(config.deadline_minutes * 60),
            progress_every: config.progress_every.max(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FanOutAction {
    /// Send `text` privately to every participant
    Broadcast { text: String },
    /// Add every participant to `target_group`
    AddMembers { target_group: String },
}

impl FanOutAction {
    fn label(&self) -> &'static str {
        match self {
            FanOutAction::Broadcast { .. } => "Broadcast",
            FanOutAction::AddMembers { .. } => "Tambah member",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FanOutJob {
    pub invite_code: String,
    pub delay: Duration,
    pub action: FanOutAction,
    /// Chat that receives progress updates and the final report
    pub report_to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanOutReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// The deadline cut the run short
    pub timed_out: bool,
    /// The run stopped before reaching any target
    pub aborted: Option<String>,
}

impl FanOutReport {
    pub fn summary(&self, label: &str) -> String {
        if let Some(reason) = &self.aborted {
            return format!("{} dibatalkan: {}", label, reason);
        }
        let mut text = format!(
            "{} selesai.\nBerhasil: {}\nGagal: {}\nTotal target: {}",
            label, self.succeeded, self.failed, self.total
        );
        if self.timed_out {
            let skipped = self.total.saturating_sub(self.succeeded + self.failed);
            text.push_str(&format!(
                "\nBatas waktu tercapai, {} target tidak diproses.",
                skipped
            ));
        }
        text
    }
}

/// Execute one fan-out run to completion, deadline, or abort.
///
/// The bot only leaves the scanned group when it joined it for this run.
pub async fn run_fan_out(gateway: Arc<dyn MessagingGateway>, job: FanOutJob, limits: FanOutLimits) -> FanOutReport {
    let label = job.action.label();
    let deadline = Instant::now() + limits.deadline;
    tracing::info!("{} started via invite {}", label, job.invite_code);

    let info = match timeout_at(deadline, gateway.invite_info(&job.invite_code)).await {
        Ok(Ok(Some(info))) => info,
        Ok(Ok(None)) => {
            return finish(&*gateway, &job, aborted("link grup tidak valid")).await;
        }
        Ok(Err(e)) => {
            tracing::warn!("{}: invite lookup failed: {}", label, e);
            return finish(&*gateway, &job, aborted("gagal membaca link grup")).await;
        }
        Err(_) => return finish(&*gateway, &job, timed_out()).await,
    };

    if let FanOutAction::AddMembers { target_group } = &job.action {
        if info.id == *target_group {
            return finish(&*gateway, &job, aborted("grup sumber sama dengan grup tujuan")).await;
        }
    }

    let already_member = info.contains(&gateway.bot_info().id);
    let group_id = if already_member {
        tracing::debug!("{}: already in {}, not joining", label, info.id);
        info.id
    } else {
        match join(&*gateway, &job, deadline).await {
            Ok(group_id) => group_id,
            Err(report) => return finish(&*gateway, &job, report).await,
        }
    };

    let report = run_joined(&*gateway, &job, &group_id, deadline, limits.progress_every).await;

    if !already_member {
        if let Err(e) = gateway.leave_group(&group_id).await {
            tracing::warn!("{}: failed to leave {}: {}", label, group_id, e);
        }
    }

    finish(&*gateway, &job, report).await
}

async fn join(gateway: &dyn MessagingGateway, job: &FanOutJob, deadline: Instant) -> Result<String, FanOutReport> {
    match timeout_at(deadline, gateway.join_group_by_invite_code(&job.invite_code)).await {
        Ok(Ok(Some(group_id))) => Ok(group_id),
        Ok(Ok(None)) => Err(aborted("link grup tidak valid")),
        Ok(Err(e)) => {
            tracing::warn!("{}: join failed: {}", job.action.label(), e);
            Err(aborted("gagal bergabung ke grup"))
        }
        Err(_) => Err(timed_out()),
    }
}

async fn run_joined(
    gateway: &dyn MessagingGateway,
    job: &FanOutJob,
    group_id: &str,
    deadline: Instant,
    progress_every: u32,
) -> FanOutReport {
    let mut report = FanOutReport::default();
    let progress_every = progress_every.max(1) as usize;

    let targets = match timeout_at(deadline, collect_targets(gateway, &job.action, group_id)).await {
        Ok(Ok(targets)) => targets,
        Ok(Err(e)) => {
            tracing::warn!("{}: scanning {} failed: {}", job.action.label(), group_id, e);
            return aborted("gagal membaca anggota grup");
        }
        Err(_) => {
            report.timed_out = true;
            return report;
        }
    };
    report.total = targets.len();

    for (i, target) in targets.iter().enumerate() {
        if i > 0 && timeout_at(deadline, sleep(job.delay)).await.is_err() {
            report.timed_out = true;
            break;
        }

        match timeout_at(deadline, perform(gateway, &job.action, target)).await {
            Ok(Ok(())) => {
                report.succeeded += 1;
                if report.succeeded % progress_every == 0 {
                    let progress = format!(
                        "{}: {}/{} berhasil",
                        job.action.label(),
                        report.succeeded,
                        report.total
                    );
                    notify(gateway, &job.report_to, progress).await;
                }
            }
            Ok(Err(e)) => {
                report.failed += 1;
                tracing::debug!("{}: {} failed: {}", job.action.label(), target, e);
            }
            Err(_) => {
                report.timed_out = true;
                break;
            }
        }
    }

    report
}

/// Participants of the scanned group the action applies to
async fn collect_targets(
    gateway: &dyn MessagingGateway,
    action: &FanOutAction,
    group_id: &str,
) -> Result<Vec<String>, GatewayError> {
    let bot_id = gateway.bot_info().id;
    let source = gateway.group_metadata(group_id).await?;
    let candidates = source
        .participants
        .into_iter()
        .map(|p| p.id)
        .filter(|id| !same_user(id, &bot_id));

    match action {
        FanOutAction::Broadcast { .. } => Ok(candidates.collect()),
        FanOutAction::AddMembers { target_group } => {
            let existing = gateway.group_metadata(target_group).await?;
            Ok(candidates.filter(|id| !existing.contains(id)).collect())
        }
    }
}

async fn perform(gateway: &dyn MessagingGateway, action: &FanOutAction, target: &str) -> Result<(), GatewayError> {
    match action {
        FanOutAction::Broadcast { text } => gateway.send_message(&Outbound::text(target, text.clone())).await,
        FanOutAction::AddMembers { target_group } => {
            let updates = gateway
                .add_participants(target_group, &[target.to_string()])
                .await?;
            if updates.iter().any(|u| u.id == target && u.ok) {
                Ok(())
            } else {
                Err(GatewayError::Rejected(format!("{} was not added", target)))
            }
        }
    }
}

async fn finish(gateway: &dyn MessagingGateway, job: &FanOutJob, report: FanOutReport) -> FanOutReport {
    let label = job.action.label();
    tracing::info!(
        "{} finished: {} ok, {} failed, {} total, timed_out={}",
        label,
        report.succeeded,
        report.failed,
        report.total,
        report.timed_out
    );
    notify(gateway, &job.report_to, report.summary(label)).await;
    report
}

async fn notify(gateway: &dyn MessagingGateway, to: &str, text: String) {
    if let Err(e) = gateway.send_message(&Outbound::text(to, text)).await {
        tracing::warn!("Failed to report to {}: {}", to, e);
    }
}

fn timed_out() -> FanOutReport {
    FanOutReport {
        timed_out: true,
        ..FanOutReport::default()
    }
}

fn aborted(reason: &str) -> FanOutReport {
    FanOutReport {
        aborted: Some(reason.to_string()),
        ..FanOutReport::default()
    }
}

/// Background fan-out runs of one bot instance
#[derive(Default)]
pub struct BackgroundTasks {
    set: Mutex<JoinSet<FanOutReport>>,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn spawn<F>(&self, task: F)
    where
        F: Future<Output = FanOutReport> + Send + 'static,
    {
        let mut set = self.set.lock().await;
        while let Some(done) = set.try_join_next() {
            if let Err(e) = done {
                tracing::warn!("Background task failed: {}", e);
            }
        }
        set.spawn(task);
    }

    /// Number of runs not yet reaped
    pub async fn len(&self) -> usize {
        self.set.lock().await.len()
    }

    /// Wait for every outstanding run and collect their reports
    pub async fn wait_all(&self) -> Vec<FanOutReport> {
        let mut set = std::mem::take(&mut *self.set.lock().await);
        let mut reports = Vec::new();
        while let Some(done) = set.join_next().await {
            match done {
                Ok(report) => reports.push(report),
                Err(e) => tracing::warn!("Background task failed: {}", e),
            }
        }
        reports
    }
}
