// macOS 全局事件
//
// 全局鼠标按下监听和应用失活通知，用于面板自动关闭。
// 监听对象只在主线程上注册和移除。

use std::cell::RefCell;

use block::ConcreteBlock;
use cocoa::base::{id, nil};
use cocoa::foundation::{NSPoint, NSRect, NSString};
use objc::{class, msg_send, sel, sel_impl};
use tauri::{AppHandle, WebviewWindow};

use macmaster::ui::{FocusSignal, Point};

use super::initialization::post_focus_signal;

// NSEventMaskLeftMouseDown | NSEventMaskRightMouseDown | NSEventMaskOtherMouseDown
const MOUSE_DOWN_MASK: u64 = (1 << 1) | (1 << 3) | (1 << 25);

struct EventMonitors {
    mouse_monitor: id,
    resign_observer: id,
}

impl Drop for EventMonitors {
    fn drop(&mut self) {
        unsafe {
            if self.mouse_monitor != nil {
                let _: () = msg_send![class!(NSEvent), removeMonitor: self.mouse_monitor];
            }
            if self.resign_observer != nil {
                let center: id = msg_send![class!(NSNotificationCenter), defaultCenter];
                let _: () = msg_send![center, removeObserver: self.resign_observer];
            }
        }
        tracing::debug!("已移除全局事件监听");
    }
}

thread_local! {
    static MONITORS: RefCell<Option<EventMonitors>> = const { RefCell::new(None) };
}

/// 当前鼠标位置，转换为主屏左上角原点、y 向下的坐标
unsafe fn mouse_location() -> Option<Point> {
    let location: NSPoint = msg_send![class!(NSEvent), mouseLocation];
    let screens: id = msg_send![class!(NSScreen), screens];
    let count: usize = msg_send![screens, count];
    if count == 0 {
        return None;
    }
    let primary: id = msg_send![screens, objectAtIndex: 0usize];
    let frame: NSRect = msg_send![primary, frame];
    Some(Point::new(location.x, frame.size.height - location.y))
}

/// 注册全局鼠标监听和应用失活通知；必须在主线程调用
pub fn install_event_monitors(app: &AppHandle) {
    let click_app = app.clone();
    let click_block = ConcreteBlock::new(move |_event: id| {
        if let Some(at) = unsafe { mouse_location() } {
            post_focus_signal(&click_app, FocusSignal::MouseDown { at });
        }
    })
    .copy();

    let resign_app = app.clone();
    let resign_block = ConcreteBlock::new(move |_notification: id| {
        post_focus_signal(&resign_app, FocusSignal::AppDeactivated);
    })
    .copy();

    let monitors = unsafe {
        let mouse_monitor: id = msg_send![
            class!(NSEvent),
            addGlobalMonitorForEventsMatchingMask: MOUSE_DOWN_MASK
            handler: &*click_block
        ];

        let center: id = msg_send![class!(NSNotificationCenter), defaultCenter];
        let queue: id = msg_send![class!(NSOperationQueue), mainQueue];
        let name = NSString::alloc(nil).init_str("NSApplicationDidResignActiveNotification");
        let resign_observer: id = msg_send![
            center,
            addObserverForName: name
            object: nil
            queue: queue
            usingBlock: &*resign_block
        ];

        EventMonitors {
            mouse_monitor,
            resign_observer,
        }
    };

    if monitors.mouse_monitor == nil {
        tracing::warn!("全局鼠标监听注册失败");
    }

    MONITORS.with(|slot| {
        // 替换旧的监听，旧值在这里被 drop 并移除
        slot.replace(Some(monitors));
    });
    tracing::debug!("已注册全局事件监听");
}

/// 移除全局事件监听；必须在主线程调用
pub fn remove_event_monitors() {
    MONITORS.with(|slot| {
        slot.borrow_mut().take();
    });
}

/// 把窗口放到最前但不让它成为键盘窗口
pub fn order_front_regardless(window: &WebviewWindow) -> tauri::Result<()> {
    let ns_window = window.ns_window()? as id;
    unsafe {
        let _: () = msg_send![ns_window, orderFrontRegardless];
    }
    Ok(())
}

/// 把应用切到前台
pub fn activate_app() {
    use cocoa::appkit::NSApplication;
    use objc::runtime::YES;

    unsafe {
        let ns_app = NSApplication::sharedApplication(nil);
        ns_app.activateIgnoringOtherApps_(YES);
    }
}
