//! A miniature bot wired entirely through the event bus.
//!
//! There is no network here. A tiny fake "connection" module feeds
//! scripted lines through the same events a real connection module would
//! raise, and the bot logic below reacts exactly as it would against a
//! live server.
//!
//! Run with: `cargo run -p ircbus --example minibot`

use ircbus::prelude::*;
use ircbus::ClientConfig;

event_kinds! {
    /// Events a connection module raises.
    enum ConnectionEvent {
        Connected,
        LineReceived,
        Disconnected,
    }
}

/// The raw line carried by a `LineReceived` event.
struct ReceivedLine {
    line: String,
}

impl Component for ReceivedLine {
    type Base = ReceivedLine;
}

/// A stand-in for a real connection module: replays a scripted session.
struct FakeConnection;

impl Module for FakeConnection {
    type Api = FakeConnection;
}

impl LoadModule for FakeConnection {
    fn load(_irc: &Irc) -> Result<Self, RuntimeError> {
        Ok(Self)
    }
}

impl FakeConnection {
    fn replay_session(&self, irc: &Irc) -> Result<(), Box<dyn std::error::Error>> {
        let manager = irc.event_manager();
        manager.post(irc.make_event(ConnectionEvent::Connected)?);

        for line in [
            ":server 001 minibot :Welcome to the network",
            "PING :server",
            ":someone!user@host PRIVMSG #bots :hello minibot",
        ] {
            let event = irc.make_event(ConnectionEvent::LineReceived)?;
            event.components().insert(ReceivedLine { line: line.into() })?;
            manager.post(event);
        }

        manager.post(irc.make_event(ConnectionEvent::Disconnected)?);
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let irc = Irc::new();
    irc.components().insert(ClientConfig::default())?;
    irc.load::<FakeConnection>()?;

    let manager = irc.event_manager();

    manager.connect_fn(
        ConnectionEvent::Connected,
        |event| {
            let Some(irc) = event.context() else {
                return Ok(());
            };
            let components = irc.components();
            let config = components
                .at::<ClientConfig>()
                .map_err(RuntimeError::Component)?;
            println!("-> NICK {}", config.identity.nickname);
            println!("-> USER {} * * :{}", config.identity.username, config.identity.realname);
            Ok(())
        },
        Priority::NORMAL,
    );

    manager.connect_fn(
        ConnectionEvent::LineReceived,
        |event| {
            let components = event.components();
            let received = components
                .at::<ReceivedLine>()
                .map_err(RuntimeError::Component)?;
            println!("<- {}", received.line);

            if received.line.contains(" 001 ") {
                println!("-> JOIN #bots");
            }
            if let Some(token) = received.line.strip_prefix("PING ") {
                println!("-> PONG {token}");
            }
            Ok(())
        },
        Priority::NORMAL,
    );

    irc.get::<FakeConnection>()?.replay_session(&irc)?;

    // the consumer loop: pull, dispatch, stop once the connection is gone
    loop {
        let Some(event) = manager.wait() else {
            break;
        };
        event.handle()?;
        if event.origin_id() == EventId::of(ConnectionEvent::Disconnected) {
            break;
        }
    }

    println!("disconnected");
    Ok(())
}
