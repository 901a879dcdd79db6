use std::io::Write;

use quiz_core::model::{AnswerOption, Question, QuestionId};
use storage::{InMemoryQuestionSource, JsonFileSource, QuestionSource, StorageError};

fn write_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write");
    file
}

#[tokio::test]
async fn json_file_source_reads_batch_in_order() {
    let file = write_file(
        r#"[
            {"id": 10, "question": "First?", "options": [
                {"text": "yes", "isCorrect": true, "rationale": "r"},
                {"text": "no", "isCorrect": false, "rationale": "x"}
            ]},
            {"id": 11, "question": "Second?", "options": [
                {"text": "yes", "isCorrect": "true", "rationale": "r"}
            ]}
        ]"#,
    );

    let source = JsonFileSource::new(file.path());
    let questions = source.load_questions(50).await.expect("load");

    let ids: Vec<_> = questions.iter().map(|q| q.id()).collect();
    assert_eq!(ids, vec![QuestionId::new(10), QuestionId::new(11)]);
    assert_eq!(questions[1].prompt(), "Second?");
}

#[tokio::test]
async fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().expect("temp dir");
    let source = JsonFileSource::new(dir.path().join("questions.json"));

    let err = source.load_questions(50).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound(path) if path.ends_with("questions.json")));
}

#[tokio::test]
async fn malformed_file_is_a_serialization_error() {
    let file = write_file(r#"[{"id": "one"}]"#);
    let err = JsonFileSource::new(file.path())
        .load_questions(50)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[tokio::test]
async fn in_memory_source_returns_its_list() {
    let source = InMemoryQuestionSource::new(Vec::new());
    assert!(source.load_questions(50).await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_record_past_the_cap_is_ignored() {
    let entries: Vec<String> = (1..=60)
        .map(|id| {
            let prompt = if id == 55 { String::new() } else { format!("Q{id}") };
            format!(r#"{{"id": {id}, "question": "{prompt}", "options": [{{"text": "a", "isCorrect": true}}]}}"#)
        })
        .collect();
    let file = write_file(&format!("[{}]", entries.join(",")));

    let questions = JsonFileSource::new(file.path())
        .load_questions(50)
        .await
        .expect("load");
    assert_eq!(questions.len(), 50);
    assert_eq!(questions.last().map(|q| q.id()), Some(QuestionId::new(50)));
}

#[tokio::test]
async fn in_memory_source_honours_the_limit() {
    let questions = (1..=5)
        .map(|id| {
            Question::new(
                QuestionId::new(id),
                format!("Q{id}"),
                vec![AnswerOption::correct("a", "r")],
            )
            .expect("valid question")
        })
        .collect();
    let source = InMemoryQuestionSource::new(questions);
    assert_eq!(source.load_questions(3).await.unwrap().len(), 3);
}
