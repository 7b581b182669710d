mod common;

use common::{Scripted, ScriptedTransport, endpoints, url};
use remix_core::{
    IngestionStrategy, JobId, MultiCallStrategy, Progress, ProgressSink, RemixError, Submission,
    Transcript, WebhookClient,
};
use serde_json::json;

fn strategy(transport: &std::sync::Arc<ScriptedTransport>) -> MultiCallStrategy {
    MultiCallStrategy::new(WebhookClient::new(transport.clone(), endpoints()))
}

fn submission() -> Submission {
    Submission::parse(" https://www.tiktok.com/@creator/video/7301 ").unwrap()
}

#[tokio::test]
async fn full_run_collects_every_section() {
    let transport = ScriptedTransport::new()
        .json(url("ingest"), 200, json!({"job_id": "job-1"}))
        .json(url("frames"), 200, json!({"frames": ["f1.jpg", "f2.jpg"]}))
        .json(
            url("transcribe"),
            200,
            json!({"speaker_1": "hello", "speaker_2": null}),
        )
        .into_arc();

    let (sink, mut progress) = ProgressSink::channel();
    let result = strategy(&transport).run(&submission(), &sink).await.unwrap();

    assert_eq!(result.job_id, Some(JobId("job-1".into())));
    assert_eq!(result.frames, ["f1.jpg", "f2.jpg"]);
    let Some(Transcript::Fields(fields)) = &result.transcript else {
        panic!("expected transcript fields");
    };
    assert_eq!(fields.len(), 2);

    let calls = transport.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(
        calls[0].body,
        Some(json!({"tiktokURL": "https://www.tiktok.com/@creator/video/7301"}))
    );
    assert_eq!(calls[1].url, url("frames"));
    assert_eq!(calls[1].body, Some(json!({"job_id": "job-1"})));
    assert_eq!(calls[2].url, url("transcribe"));
    assert_eq!(calls[2].body, Some(json!({"job_id": "job-1"})));

    drop(sink);
    let mut events = Vec::new();
    while let Some(event) = progress.recv().await {
        events.push(event);
    }
    assert_eq!(events.len(), 4);
    assert_eq!(events[0], Progress::JobAccepted(JobId("job-1".into())));
    assert_eq!(events[2], Progress::TranscriptRequested);
    assert!(matches!(events[3], Progress::TranscriptSettled(Some(_))));
}

#[tokio::test]
async fn job_id_takes_priority_over_other_aliases() {
    let transport = ScriptedTransport::new()
        .json(
            url("ingest"),
            200,
            json!({"id": "plain", "jobId": "camel", "job_id": "snake"}),
        )
        .json(url("frames"), 200, json!({}))
        .json(url("transcribe"), 200, json!({}))
        .into_arc();

    let result = strategy(&transport)
        .run(&submission(), &ProgressSink::discard())
        .await
        .unwrap();

    assert_eq!(result.job_id, Some(JobId("snake".into())));
    assert_eq!(transport.calls()[1].body, Some(json!({"job_id": "snake"})));
}

#[tokio::test]
async fn missing_job_id_stops_before_frames() {
    let transport = ScriptedTransport::new()
        .json(url("ingest"), 200, json!({"status": "queued"}))
        .json(url("frames"), 200, json!({"frames": ["f.jpg"]}))
        .json(url("transcribe"), 200, json!({"text": "hi"}))
        .into_arc();

    let err = strategy(&transport)
        .run(&submission(), &ProgressSink::discard())
        .await
        .unwrap_err();

    assert!(matches!(err, RemixError::MissingJobId));
    assert_eq!(err.to_string(), "No job_id received from ingest endpoint");
    assert_eq!(transport.urls_called(), [url("ingest")]);
}

#[tokio::test]
async fn ingest_http_failure_reports_status_text() {
    let transport = ScriptedTransport::new()
        .json(url("ingest"), 502, json!({"job_id": "ignored"}))
        .into_arc();

    let err = strategy(&transport)
        .run(&submission(), &ProgressSink::discard())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Ingest failed: Bad Gateway");
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn ingest_network_failure_is_fatal() {
    let transport = ScriptedTransport::new()
        .on(url("ingest"), Scripted::NetworkError("connection refused".into()))
        .into_arc();

    let err = strategy(&transport)
        .run(&submission(), &ProgressSink::discard())
        .await
        .unwrap_err();

    assert!(matches!(err, RemixError::Network { .. }));
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn frames_failure_does_not_stop_transcript() {
    let transport = ScriptedTransport::new()
        .json(url("ingest"), 200, json!({"jobId": "job-2"}))
        .json(url("frames"), 500, json!({"error": "not ready"}))
        .json(url("transcribe"), 200, json!({"summary": "a dance video"}))
        .into_arc();

    let result = strategy(&transport)
        .run(&submission(), &ProgressSink::discard())
        .await
        .unwrap();

    assert!(result.frames.is_empty());
    assert!(result.transcript.is_some());
    assert_eq!(
        transport.urls_called(),
        [url("ingest"), url("frames"), url("transcribe")]
    );
}

#[tokio::test]
async fn transcript_failures_are_swallowed() {
    let transport = ScriptedTransport::new()
        .json(url("ingest"), 200, json!({"id": 99}))
        .json(url("frames"), 200, json!({"thumbnails": ["t.jpg"]}))
        .on(url("transcribe"), Scripted::NetworkError("reset".into()))
        .into_arc();

    let (sink, mut progress) = ProgressSink::channel();
    let result = strategy(&transport).run(&submission(), &sink).await.unwrap();

    assert_eq!(result.job_id, Some(JobId("99".into())));
    assert_eq!(result.frames, ["t.jpg"]);
    assert_eq!(result.transcript, None);

    drop(sink);
    let mut last = None;
    while let Some(event) = progress.recv().await {
        last = Some(event);
    }
    assert_eq!(last, Some(Progress::TranscriptSettled(None)));
}

#[tokio::test]
async fn invalid_frames_json_is_swallowed() {
    let transport = ScriptedTransport::new()
        .json(url("ingest"), 200, json!({"job_id": "job-3"}))
        .on(
            url("frames"),
            Scripted::Reply(remix_core::HttpReply::new(200, "<html>oops</html>")),
        )
        .json(url("transcribe"), 200, json!({"text": "hi"}))
        .into_arc();

    let result = strategy(&transport)
        .run(&submission(), &ProgressSink::discard())
        .await
        .unwrap();

    assert!(result.frames.is_empty());
    assert!(result.transcript.is_some());
}
