//! TwiML rendering: turns a [`Directive`] into the provider's voice markup.
//!
//! Only three verbs are used: `<Say>`, `<Gather>`, `<Hangup/>`. Every
//! non-terminating response ends in a `<Gather>` pointing back at `/voice`,
//! which is what makes the provider call us again with the next keypress.

use hotline_core::{Directive, Prompt};

const REMINDER: &str = "Remember, use 2 for up, 8 for down, 4 for left, and 6 for right.";
const WELCOME_BACK: &str = "Thanks for coming back to play, rejoining your previous game.";
const ENTER_PIN: &str = "Enter your game pin.";
const NEXT_MOVE: &str = "Choose your next move.";

/// Render a directive as a complete TwiML document.
pub fn render(directive: &Directive) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><Response>"#);
    say(&mut xml, &announcement(&directive.prompt));

    if directive.terminate {
        xml.push_str("<Hangup/>");
    } else {
        xml.push_str(r#"<Gather action="/voice" method="GET">"#);
        for line in gather_lines(directive) {
            say(&mut xml, line);
        }
        xml.push_str("</Gather>");
    }

    xml.push_str("</Response>");
    xml
}

/// The spoken acknowledgment of what just happened.
fn announcement(prompt: &Prompt) -> String {
    match prompt {
        // A returning caller hears the same opener as a new one; the
        // gather below is where the two differ.
        Prompt::GetReady | Prompt::WelcomeBack => "Get ready!".to_string(),
        Prompt::CodeSet(code) => format!("Setting your game code to {}.", code.spoken()),
        Prompt::Moving(direction) => format!("Moving {direction}"),
        Prompt::InvalidInput => "Please only enter one digit at a time!".to_string(),
        Prompt::InvalidMove => "You selected an invalid move, goodbye.".to_string(),
        Prompt::SessionRemoved => "Removing your game session!".to_string(),
    }
}

/// What the gather speaks while waiting for the next keypress.
fn gather_lines(directive: &Directive) -> Vec<&'static str> {
    match &directive.prompt {
        Prompt::GetReady => vec![ENTER_PIN],
        Prompt::WelcomeBack => vec![WELCOME_BACK, REMINDER],
        _ if directive.first_turn => vec![REMINDER],
        _ => vec![NEXT_MOVE],
    }
}

fn say(xml: &mut String, text: &str) {
    xml.push_str("<Say>");
    xml.push_str(&escape(text));
    xml.push_str("</Say>");
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
