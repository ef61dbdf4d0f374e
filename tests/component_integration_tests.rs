//! Component integration tests.
//!
//! Wires the engine to its collaborators (notification dispatcher, menu bar
//! model, console) the way the binary does, with mocks at the platform
//! boundary.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

use cirrus::cli::Console;
use cirrus::engine::{TimerCommand, TimerEngine, TimerEvent};
use cirrus::menubar::{MenuAction, MenuItemId, TrayIconManager, TrayUpdate};
use cirrus::notification::{MockNotificationSender, NotificationDispatcher};
use cirrus::types::{TimerConfig, TimerPhase};

fn create_engine(minutes: f64) -> (TimerEngine, mpsc::UnboundedReceiver<TimerEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let engine = TimerEngine::new(TimerConfig::new(minutes).unwrap(), tx).unwrap();
    (engine, rx)
}

// ============================================================================
// Engine -> Notifications
// ============================================================================

mod notification_integration {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn expiry_produces_one_alert_with_run_minutes() {
        let (mut engine, events) = create_engine(1.0);
        let mock = Arc::new(MockNotificationSender::new());
        let dispatcher = NotificationDispatcher::new(Some(Arc::clone(&mock)));
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let engine_task = tokio::spawn(async move {
            engine.run(cmd_rx).await;
        });
        let dispatcher_task = tokio::spawn(async move { dispatcher.run(events).await });

        cmd_tx.send(TimerCommand::Start).unwrap();
        sleep(Duration::from_millis(60_500)).await;

        cmd_tx.send(TimerCommand::Shutdown).unwrap();
        engine_task.await.unwrap();
        dispatcher_task.await.unwrap();

        let notifications = mock.get_notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].title, "Timer Finished!");
        assert_eq!(notifications[0].body, "Your timer for 1 minute has ended.");
    }

    #[tokio::test(start_paused = true)]
    async fn alert_uses_minutes_captured_at_start() {
        let (mut engine, events) = create_engine(25.0);
        let mock = Arc::new(MockNotificationSender::new());
        let dispatcher = NotificationDispatcher::new(Some(Arc::clone(&mock)));
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let engine_task = tokio::spawn(async move {
            engine.run(cmd_rx).await;
        });
        let dispatcher_task = tokio::spawn(async move { dispatcher.run(events).await });

        cmd_tx.send(TimerCommand::Start).unwrap();
        sleep(Duration::from_millis(500)).await;
        cmd_tx.send(TimerCommand::SetDuration(5.0)).unwrap();
        sleep(Duration::from_secs(1500)).await;

        cmd_tx.send(TimerCommand::Shutdown).unwrap();
        engine_task.await.unwrap();
        dispatcher_task.await.unwrap();

        let notifications = mock.get_notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].body, "Your timer for 25 minutes has ended.");
    }

    #[tokio::test(start_paused = true)]
    async fn aborted_run_sends_nothing() {
        let (mut engine, events) = create_engine(1.0);
        let mock = Arc::new(MockNotificationSender::new());
        let dispatcher = NotificationDispatcher::new(Some(Arc::clone(&mock)));
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let engine_task = tokio::spawn(async move {
            engine.run(cmd_rx).await;
        });
        let dispatcher_task = tokio::spawn(async move { dispatcher.run(events).await });

        cmd_tx.send(TimerCommand::Start).unwrap();
        sleep(Duration::from_millis(30_500)).await;
        cmd_tx.send(TimerCommand::Reset).unwrap();
        sleep(Duration::from_secs(120)).await;

        cmd_tx.send(TimerCommand::Shutdown).unwrap();
        engine_task.await.unwrap();
        dispatcher_task.await.unwrap();

        assert_eq!(mock.notification_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_delivery_does_not_stop_timer() {
        let (mut engine, events) = create_engine(1.0);
        let mock = Arc::new(MockNotificationSender::new());
        mock.set_should_fail(true);
        let dispatcher = NotificationDispatcher::new(Some(Arc::clone(&mock)));
        let snapshots = engine.subscribe();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let engine_task = tokio::spawn(async move {
            engine.run(cmd_rx).await;
        });
        let dispatcher_task = tokio::spawn(async move { dispatcher.run(events).await });

        cmd_tx.send(TimerCommand::Start).unwrap();
        sleep(Duration::from_millis(60_500)).await;

        // Engine still answers commands after the failed alert.
        cmd_tx.send(TimerCommand::Start).unwrap();
        sleep(Duration::from_millis(2_500)).await;
        assert_eq!(snapshots.borrow().remaining_seconds, 58);

        cmd_tx.send(TimerCommand::Shutdown).unwrap();
        engine_task.await.unwrap();
        dispatcher_task.await.unwrap();
    }
}

// ============================================================================
// Engine -> Menu bar
// ============================================================================

mod menubar_integration {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn tray_follows_engine_snapshots() {
        let (mut engine, _events) = create_engine(25.0);
        let (tray_tx, tray_rx) = crossbeam_channel::unbounded();
        let mut tray = TrayIconManager::new(engine.snapshot(), vec![5, 10, 25], tray_rx);

        assert_eq!(tray.generate_title(), "25:00");
        assert_eq!(tray.generate_menu_config().toggle.text, "Start");

        engine.start();
        tray_tx.send(TrayUpdate::Refresh(engine.snapshot())).unwrap();
        tray.process_pending_updates();
        assert_eq!(tray.generate_menu_config().toggle.text, "Pause");

        engine.pause();
        tray_tx.send(TrayUpdate::Refresh(engine.snapshot())).unwrap();
        tray.process_pending_updates();
        let menu = tray.generate_menu_config();
        assert_eq!(menu.toggle.text, "Resume");
        assert!(menu.reset.enabled);
    }

    #[tokio::test(start_paused = true)]
    async fn menu_clicks_map_to_engine_commands() {
        let (mut engine, _events) = create_engine(25.0);

        let click = |id: &str| {
            MenuItemId::parse(id)
                .to_action()
                .map(|action: MenuAction| action.to_command())
        };

        engine.apply(click("toggle").unwrap()).unwrap();
        assert_eq!(engine.phase(), TimerPhase::Running);

        engine.apply(click("preset:10").unwrap()).unwrap();
        assert_eq!(engine.phase(), TimerPhase::Stopped);
        assert_eq!(engine.remaining_seconds(), 600);

        assert_eq!(click("quit"), Some(TimerCommand::Shutdown));
        assert_eq!(click("header"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn preset_ids_from_menu_round_trip() {
        let (engine, _events) = create_engine(25.0);
        let (_tray_tx, tray_rx) = crossbeam_channel::unbounded();
        let tray = TrayIconManager::new(engine.snapshot(), vec![5, 45], tray_rx);

        let ids: Vec<MenuItemId> = tray
            .generate_menu_config()
            .presets
            .iter()
            .map(|item| MenuItemId::parse(&item.id.as_id()))
            .collect();

        assert_eq!(ids, vec![MenuItemId::Preset(5), MenuItemId::Preset(45)]);
    }
}

// ============================================================================
// Console -> Engine
// ============================================================================

mod console_integration {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn console_script_drives_engine() {
        let (mut engine, _events) = create_engine(25.0);
        let snapshots = engine.subscribe();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let mut console = Console::new(cmd_tx, engine.subscribe());

        let input: &[u8] = b"preset 5\nstart\nbogus\nduration 0\nquit\n";
        console.run(input).await.unwrap();
        drop(console);

        engine.run(cmd_rx).await;

        assert_eq!(snapshots.borrow().phase, TimerPhase::Running);
        assert_eq!(snapshots.borrow().remaining_seconds, 300);
    }

    #[tokio::test(start_paused = true)]
    async fn each_command_is_applied_before_the_next_line() {
        let (mut engine, _events) = create_engine(25.0);
        let snapshots = engine.subscribe();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let mut console = Console::new(cmd_tx, engine.subscribe());

        let engine_task = tokio::spawn(async move {
            engine.run(cmd_rx).await;
        });

        console.run(&b"preset 10\nstart\n"[..]).await.unwrap();

        // No settling: the console already saw both commands applied.
        assert_eq!(snapshots.borrow().phase, TimerPhase::Running);
        assert_eq!(snapshots.borrow().remaining_seconds, 600);

        drop(console);
        engine_task.await.unwrap();
    }
}
