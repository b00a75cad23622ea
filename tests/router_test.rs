//! Cross-command routing behavior: ordering, fall-through, and side-effect
//! commands sharing a message.

mod helpers;

use helpers::test_bot;

#[test]
fn reaction_rule_fires_and_falls_through_to_recall() {
    let bot = test_bot();

    bot.say("?react :wave: to hello");

    // "hello" is plain text: no command claims it before react, react adds
    // the emoji and produces no reply.
    let replies = bot.say("hello");
    assert!(replies.is_empty());

    let reactions = bot.transport.reactions.lock().unwrap();
    assert_eq!(reactions.len(), 1);
    assert_eq!(reactions[0].2, "wave");
}

#[test]
fn recall_stops_before_react_sees_the_message() {
    let bot = test_bot();

    // Both a recall value and a reaction rule exist for the same text.
    bot.say("?learn hello greeting");
    bot.say("?react :wave: to ?hello");

    // The recall command is non-continuing and registered before react, so
    // the reaction never fires for `?hello`.
    let replies = bot.say("?hello");
    assert_eq!(replies, vec!["greeting".to_string()]);
    assert!(bot.transport.reactions.lock().unwrap().is_empty());
}

#[test]
fn karma_trigger_beats_recall_on_colliding_target() {
    let bot = test_bot();

    bot.say("?learn gopher a rodent");
    let replies = bot.say("?++ gopher");
    assert_eq!(replies.len(), 1);
    assert!(replies[0].contains("gave a plus to gopher"));
}

#[test]
fn one_message_never_produces_more_than_one_reply_per_command() {
    let bot = test_bot();

    bot.say("?learn cat meow");
    let replies = bot.say("?cat");
    assert_eq!(replies.len(), 1);
}

#[test]
fn unknown_commands_are_ignored_entirely() {
    let bot = test_bot();
    assert!(bot.say("?").is_empty());
    assert!(bot.say("no commands here").is_empty());
    assert!(bot.transport.sent.lock().unwrap().is_empty());
}
