// 应用初始化
//
// 配置、日志、窗口管理器、内存提醒和系统采样在这里组装，之后交给 Tauri 托管

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use anyhow::Context;
use tauri::{AppHandle, Emitter, Manager, WebviewUrl, WebviewWindowBuilder};
use tokio::sync::oneshot;

use macmaster::core::LoggerGuard;
use macmaster::error::{AppError, AppResult};
use macmaster::models::{AlertAction, AppConfig, OffendingProcess};
use macmaster::services::{
    app_data_dir, read_app_config, run_sampler, terminate_process, MemoryMonitor, MetricsHub,
    Subscription,
};
use macmaster::ui::{FocusSignal, FocusTracker, MemoryAlertController, MonitorActions, WindowId, WindowManager};

use super::host::TauriHost;

pub const MAIN_WINDOW_LABEL: &str = "main";
pub const SNAPSHOT_EVENT: &str = "metrics://snapshot";

pub type AppWindowManager = WindowManager<TauriHost>;
pub type AppAlertController = MemoryAlertController<TauriHost, MonitorBridge>;

/// 菜单栏界面状态；只在主线程上加锁。需要同时持有时先 `alert` 后 `windows`
pub struct UiState {
    pub windows: Arc<Mutex<AppWindowManager>>,
    pub focus: Arc<Mutex<FocusTracker>>,
    pub alert: Arc<Mutex<AppAlertController>>,
}

pub struct MetricsState {
    pub hub: Arc<MetricsHub>,
    _subscriptions: Vec<Subscription>,
}

/// 应用退出前一直持有，保证文件日志刷盘
pub struct LoggerState(pub LoggerGuard);

/// 提醒浮窗按钮对应的内存监控操作
pub struct MonitorBridge {
    app: AppHandle,
    monitor: Arc<Mutex<MemoryMonitor>>,
    windows: Arc<Mutex<AppWindowManager>>,
}

impl MonitorBridge {
    fn monitor(&self) -> std::sync::MutexGuard<'_, MemoryMonitor> {
        self.monitor.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MonitorActions for MonitorBridge {
    fn snooze(&self, process: &OffendingProcess, duration: Duration) {
        self.monitor()
            .snooze(&process.name, duration, Instant::now());
    }

    fn ignore_permanently(&self, process: &OffendingProcess) {
        self.monitor().ignore(&process.name);
    }

    fn terminate_offending_process(&self, process: &OffendingProcess) -> AppResult<()> {
        terminate_process(process.pid, &process.name)
    }

    /// 关闭面板，显示并激活主程序窗口；提醒浮窗由调用方先行收起
    fn open_main_application(&self) {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .close_all();
        if let Err(e) = show_main_window(&self.app) {
            tracing::error!(error = %e, "打开主程序窗口失败");
        }
    }
}

/// 显示（必要时创建）主程序窗口并激活应用
fn show_main_window(app: &AppHandle) -> AppResult<()> {
    let window = match app.get_webview_window(MAIN_WINDOW_LABEL) {
        Some(window) => window,
        None => WebviewWindowBuilder::new(
            app,
            MAIN_WINDOW_LABEL,
            WebviewUrl::App("index.html#/app".into()),
        )
        .title("Mac优化大师")
        .inner_size(960.0, 640.0)
        .min_inner_size(720.0, 480.0)
        .center()
        .build()?,
    };

    if let Err(e) = window.show() {
        tracing::error!(error = ?e, "显示主窗口失败");
    }
    if let Err(e) = window.unminimize() {
        tracing::error!(error = ?e, "取消最小化失败");
    }
    if let Err(e) = window.set_focus() {
        tracing::error!(error = ?e, "设置焦点失败");
    }

    #[cfg(target_os = "macos")]
    super::macos::activate_app();

    Ok(())
}

/// 在主线程上执行 `f` 并等待结果
pub async fn run_on_main<T, F>(app: &AppHandle, f: F) -> AppResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    app.run_on_main_thread(move || {
        let _ = tx.send(f());
    })?;
    rx.await
        .map_err(|_| AppError::window("主线程任务未执行"))
}

/// 在主线程上操作窗口管理器并等待结果
pub async fn with_windows<T, F>(app: &AppHandle, f: F) -> AppResult<T>
where
    F: FnOnce(&mut AppWindowManager) -> T + Send + 'static,
    T: Send + 'static,
{
    let windows = app.state::<UiState>().windows.clone();
    run_on_main(app, move || {
        let mut manager = windows.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut manager)
    })
    .await
}

pub async fn with_alert<T, F>(app: &AppHandle, f: F) -> AppResult<T>
where
    F: FnOnce(&mut AppAlertController) -> T + Send + 'static,
    T: Send + 'static,
{
    let alert = app.state::<UiState>().alert.clone();
    run_on_main(app, move || {
        let mut controller = alert.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut controller)
    })
    .await
}

/// 投递到主线程操作窗口管理器，不等待结果（用于同步的事件回调）
pub fn post_to_windows<F>(app: &AppHandle, f: F)
where
    F: FnOnce(&mut AppWindowManager) + Send + 'static,
{
    let Some(state) = app.try_state::<UiState>() else {
        tracing::warn!("界面状态尚未初始化");
        return;
    };
    let windows = state.windows.clone();
    if let Err(e) = app.run_on_main_thread(move || {
        let mut manager = windows.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut manager);
    }) {
        tracing::warn!(error = %e, "无法调度窗口操作");
    }
}

/// 投递到主线程操作内存提醒，不等待结果
pub fn post_to_alert<F>(app: &AppHandle, f: F)
where
    F: FnOnce(&mut AppAlertController) + Send + 'static,
{
    let Some(state) = app.try_state::<UiState>() else {
        tracing::warn!("界面状态尚未初始化");
        return;
    };
    let alert = state.alert.clone();
    if let Err(e) = app.run_on_main_thread(move || {
        let mut controller = alert.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut controller);
    }) {
        tracing::warn!(error = %e, "无法调度内存提醒操作");
    }
}

/// 收起菜单栏界面并打开主程序；状态栏菜单、提醒浮窗和命令共用这一条路径
pub fn post_open_main_app(app: &AppHandle) {
    post_to_alert(app, |alert| {
        if let Err(e) = alert.perform(AlertAction::OpenMainApp) {
            tracing::error!(error = %e, "打开主程序失败");
        }
    });
}

/// 把自动关闭信号投递到主线程处理。
///
/// 失去焦点时继任的键盘窗口尚未就绪。事件回调本身就在主线程上，
/// 在主线程调用 `run_on_main_thread` 会立即执行，所以先切到异步任务，
/// 再经事件循环代理投递，保证在下一轮事件循环才查询键盘窗口。
pub fn post_focus_signal(app: &AppHandle, signal: FocusSignal) {
    let Some(state) = app.try_state::<UiState>() else {
        return;
    };
    let windows = state.windows.clone();
    let focus = state.focus.clone();
    let app = app.clone();
    tauri::async_runtime::spawn(async move {
        let result = app.run_on_main_thread(move || {
            let mut manager = windows.lock().unwrap_or_else(PoisonError::into_inner);
            let closed = focus
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .handle(&signal, &mut manager);
            if closed {
                tracing::debug!(signal = ?signal, "面板已自动关闭");
            }
        });
        if let Err(e) = result {
            tracing::warn!(error = %e, "无法调度自动关闭");
        }
    });
}

/// 窗口失去焦点
pub fn on_window_blur(app: &AppHandle, label: &str) {
    post_focus_signal(
        app,
        FocusSignal::ResignedKey {
            window: WindowId::new(label),
        },
    );
}

fn load_config() -> AppConfig {
    match read_app_config().context("读取 ~/.macmaster/config.json 失败") {
        Ok(config) => config,
        Err(e) => {
            // 日志尚未初始化，只能输出到 stderr
            eprintln!("{:#}，使用默认配置", e);
            AppConfig::default()
        }
    }
}

/// 初始化应用状态并启动后台任务
pub fn initialize_app(app: &AppHandle) -> AppResult<()> {
    let config = load_config();
    let log_dir = app_data_dir()?.join("logs");
    let guard = macmaster::init_logger(&config.log_config, &log_dir)?;
    app.manage(LoggerState(guard));

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        threshold = config.alert.threshold,
        interval_secs = config.alert.sample_interval_secs,
        "Mac优化大师菜单栏组件启动"
    );

    let host = TauriHost::new(app.clone());
    let windows = Arc::new(Mutex::new(WindowManager::new(host.clone())));
    let monitor = Arc::new(Mutex::new(MemoryMonitor::new(config.alert.threshold)));
    let bridge = MonitorBridge {
        app: app.clone(),
        monitor: monitor.clone(),
        windows: windows.clone(),
    };
    let alert = Arc::new(Mutex::new(MemoryAlertController::new(host, bridge)));

    let hub = Arc::new(MetricsHub::new());
    let subscriptions = vec![
        subscribe_alert(app, &hub, alert.clone()),
        subscribe_webviews(app, &hub),
    ];

    app.manage(UiState {
        windows,
        focus: Arc::new(Mutex::new(FocusTracker::new())),
        alert,
    });
    app.manage(MetricsState {
        hub: hub.clone(),
        _subscriptions: subscriptions,
    });

    let interval = Duration::from_secs(config.alert.sample_interval_secs);
    tauri::async_runtime::spawn(run_sampler(hub, monitor, interval));

    Ok(())
}

/// 快照驱动内存提醒浮窗
fn subscribe_alert(
    app: &AppHandle,
    hub: &MetricsHub,
    alert: Arc<Mutex<AppAlertController>>,
) -> Subscription {
    let app = app.clone();
    hub.subscribe(move |snapshot| {
        let alert = alert.clone();
        let result = app.run_on_main_thread(move || {
            alert
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .on_snapshot(&snapshot);
        });
        if let Err(e) = result {
            tracing::warn!(error = %e, "无法调度内存提醒");
        }
    })
}

/// 快照广播给所有前端窗口
fn subscribe_webviews(app: &AppHandle, hub: &MetricsHub) -> Subscription {
    let app = app.clone();
    hub.subscribe(move |snapshot| {
        if let Err(e) = app.emit(SNAPSHOT_EVENT, &snapshot) {
            tracing::warn!(error = %e, "推送系统快照失败");
        }
    })
}
