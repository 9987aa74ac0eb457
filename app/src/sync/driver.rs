use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time;
use utils::error::{Error, Result};

use super::event_log::EventLog;
use super::synchronizer::Synchronizer;

/// 同步参数 - 来自CLI的输入参数
#[derive(Debug, Clone)]
pub struct SyncParams {
    /// 源目录
    pub source: PathBuf,

    /// 副本目录
    pub replica: PathBuf,

    /// 两次同步之间的间隔（秒）
    pub interval: u64,

    /// 事件日志文件
    pub log_file: PathBuf,

    /// 是否记录新出现的顶层条目
    pub track_new_items: bool,

    /// 控制台输出是否着色
    pub color: bool,
}

impl Default for SyncParams {
    fn default() -> Self {
        Self {
            source: PathBuf::from("source"),
            replica: PathBuf::from("replica"),
            interval: 60,
            log_file: PathBuf::from("sync.log"),
            track_new_items: true,
            color: true,
        }
    }
}

/// 同步主循环：同步一次，然后等待间隔，直到收到关闭信号
///
/// A shutdown requested while a pass is running is honored once the pass
/// finishes; passes are never interrupted halfway.
pub async fn run(params: SyncParams, mut shutdown: watch::Receiver<bool>) -> Result<()> {
    log::info!("Starting sync loop with params: {:?}", params);

    if !params.color {
        colored::control::set_override(false);
    }

    let event_log = EventLog::create(&params.log_file)?;
    let mut synchronizer = Synchronizer::new(&params.source, &params.replica, event_log)
        .track_new_items(params.track_new_items);
    let interval = Duration::from_secs(params.interval);
    let mut pass = 0u64;

    loop {
        if *shutdown.borrow() {
            break;
        }

        pass += 1;
        // 同步是阻塞的文件系统操作，放到阻塞线程池中执行
        let (returned, outcome) = tokio::task::spawn_blocking(move || {
            let outcome = synchronizer.synchronize();
            (synchronizer, outcome)
        })
        .await
        .map_err(|e| Error::with_source("Synchronization task failed", Box::new(e)))?;
        synchronizer = returned;

        let stats = outcome?;
        log::info!("Pass {} finished: {}", pass, stats);

        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() {
                    log::warn!("Shutdown channel closed, stopping");
                }
                break;
            }
            _ = time::sleep(interval) => {}
        }
    }

    log::info!("Sync loop stopped after {} passes", pass);
    Ok(())
}
