mod common;

use common::{scripted, transcript};
use fieldgen::error::Error;
use fieldgen::prompt::{parse_choice, parse_yes_no, Prompter, Style};

#[test]
fn test_yes_no_parsing() {
    assert_eq!(parse_yes_no("yes"), Some(true));
    assert_eq!(parse_yes_no("Y"), Some(true));
    assert_eq!(parse_yes_no(" no "), Some(false));
    assert_eq!(parse_yes_no("n"), Some(false));
    assert_eq!(parse_yes_no("maybe"), None);
    assert_eq!(parse_yes_no(""), None);
}

#[test]
fn test_choice_parsing() {
    assert_eq!(parse_choice("1", 3), Some(0));
    assert_eq!(parse_choice("3", 3), Some(2));
    assert_eq!(parse_choice("0", 3), None);
    assert_eq!(parse_choice("4", 3), None);
    assert_eq!(parse_choice("two", 3), None);
}

#[test]
fn test_ask_repeats_until_answered() {
    let mut prompt = scripted("\n   \nGermplasm Summary\n");

    let answer = prompt.ask("Field Label: ", Style::Plain).unwrap();
    assert_eq!(answer, "Germplasm Summary");

    let output = transcript(prompt);
    assert_eq!(output.matches("Field Label: ").count(), 3);
    assert_eq!(output.matches("This field is required").count(), 2);
}

#[test]
fn test_ask_bool_accepts_only_yes_no_forms() {
    let mut prompt = scripted("sure\nYES\n");
    assert!(prompt.ask_bool("Continue?", Style::Warn).unwrap());

    let output = transcript(prompt);
    assert!(output.contains("Continue? [y/n]"));
    assert_eq!(output.matches("Please answer y or n.").count(), 1);

    let mut prompt = scripted("n\n");
    assert!(!prompt.ask_bool("Continue?", Style::Plain).unwrap());
}

#[test]
fn test_multiple_choice_is_one_based() {
    let options = vec!["first".to_string(), "second".to_string(), "third".to_string()];
    let mut prompt = scripted("0\n7\nabc\n2\n");

    let index = prompt.ask_multiple_choice("Pick one", &options, Style::Plain).unwrap();
    assert_eq!(index, 1);

    let output = transcript(prompt);
    assert!(output.contains("[1] first"));
    assert!(output.contains("[3] third"));
    assert_eq!(output.matches("is not a valid choice").count(), 3);
}

#[test]
fn test_end_of_input_is_an_error() {
    let mut prompt = scripted("");
    match prompt.ask("Field Label: ", Style::Plain) {
        Err(Error::Prompt(_)) => (),
        other => panic!("Expected prompt error, got {other:?}"),
    }
}

#[test]
fn test_say_writes_a_line() {
    let mut prompt = scripted("");
    prompt.say(Style::Success, "Field generated successfully.");
    assert!(transcript(prompt).contains("Field generated successfully."));
}
