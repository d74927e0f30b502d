use drawing_evaluation::clients::transport::{EVALUATE_PATH, STATS_PATH, STATUS_PATH};
use drawing_evaluation::clients::{ApiRequest, ApiResponse};
use drawing_evaluation::{
    format_summary, validate, ApiClient, BatchProcessor, Config, EvalResult, EvaluationError,
    EvaluationRequest, Evaluator, ExerciseContext, ExpectedShape, HttpTransport, ModelSettings,
    Point, StaticToken, Transport,
};
use serde_json::json;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

type Handler = dyn Fn(&ApiRequest) -> (Duration, EvalResult<ApiResponse>) + Send + Sync;

/// 内存传输：按请求返回 (延迟, 响应)，并记录每个请求的开始时间
struct MockTransport {
    handler: Box<Handler>,
    started: Mutex<Vec<(String, Instant)>>,
}

impl MockTransport {
    fn new(handler: impl Fn(&ApiRequest) -> (Duration, EvalResult<ApiResponse>) + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            started: Mutex::new(Vec::new()),
        }
    }

    fn started(&self) -> Vec<(String, Instant)> {
        self.started.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> EvalResult<ApiResponse> {
        self.started
            .lock()
            .unwrap()
            .push((patient_of(&request), Instant::now()));
        let (delay, response) = (self.handler)(&request);
        tokio::time::sleep(delay).await;
        response
    }
}

fn patient_of(request: &ApiRequest) -> String {
    request
        .body
        .as_ref()
        .and_then(|b| b["coordenadas"]["contexto"]["paciente"].as_str())
        .unwrap_or_default()
        .to_string()
}

fn index_of(request: &ApiRequest) -> usize {
    patient_of(request)
        .trim_start_matches("p-")
        .parse()
        .unwrap_or(usize::MAX)
}

fn evaluator_output(score: usize) -> String {
    json!({
        "score": score,
        "analysis": format!("drawing {}", score),
        "detectedShape": "square",
        "precision": 0.5,
        "coverage": 0.5,
    })
    .to_string()
}

fn ok_envelope(data: &str) -> EvalResult<ApiResponse> {
    Ok(ApiResponse::new(
        200,
        json!({"success": true, "data": data, "metadata": {"tokensUsed": 42}}).to_string(),
    ))
}

fn square() -> Vec<Point> {
    vec![
        Point::new(10.0, 10.0),
        Point::new(60.0, 10.0),
        Point::new(60.0, 60.0),
        Point::new(10.0, 60.0),
    ]
}

fn requests(n: usize) -> Vec<EvaluationRequest> {
    (0..n)
        .map(|i| {
            EvaluationRequest::new(
                square(),
                square(),
                ExerciseContext::new("copy-figure", ExpectedShape::Square).with_patient(format!("p-{}", i)),
            )
        })
        .collect()
}

fn processor(transport: MockTransport, timeout: Duration) -> BatchProcessor<MockTransport, StaticToken> {
    let client = ApiClient::new(transport, StaticToken::new("token"), timeout);
    let evaluator = Evaluator::new(client, ModelSettings::from(&Config::default()));
    BatchProcessor::new(evaluator)
}

#[tokio::test(start_paused = true)]
async fn test_batch_of_twelve_runs_three_groups_with_two_pauses() {
    let transport = MockTransport::new(|request| {
        (Duration::from_millis(100), ok_envelope(&evaluator_output(index_of(request))))
    });
    let processor = processor(transport, Duration::from_secs(30));

    let t0 = Instant::now();
    let outcomes = processor.evaluate_batch(&requests(12)).await;

    assert_eq!(outcomes.len(), 12);
    for (i, outcome) in outcomes.iter().enumerate() {
        assert_eq!(outcome.result().unwrap().score as usize, i);
        assert_eq!(outcome.metadata().processing_time_ms, 100);
        assert_eq!(outcome.metadata().tokens_used, Some(42));
    }

    // 三组，组内同时开始，组间 1000ms
    let started = processor.evaluator().client().transport().started();
    assert_eq!(started.len(), 12);
    for (patient, at) in &started {
        let idx: usize = patient.trim_start_matches("p-").parse().unwrap();
        let expected = Duration::from_millis(1100 * (idx / 5) as u64);
        assert_eq!(*at - t0, expected, "request {} started at wrong time", idx);
    }
    assert_eq!(t0.elapsed(), Duration::from_millis(3 * 100 + 2 * 1000));
}

#[tokio::test(start_paused = true)]
async fn test_order_preserved_when_completion_order_differs() {
    // 组内越靠前的请求越晚完成
    let transport = MockTransport::new(|request| {
        let idx = index_of(request);
        let delay = Duration::from_millis(50 * (5 - (idx % 5)) as u64);
        (delay, ok_envelope(&evaluator_output(idx)))
    });
    let processor = processor(transport, Duration::from_secs(30));

    let outcomes = processor.evaluate_batch(&requests(7)).await;

    let scores: Vec<u8> = outcomes.iter().map(|o| o.result().unwrap().score).collect();
    assert_eq!(scores, vec![0, 1, 2, 3, 4, 5, 6]);
}

#[tokio::test(start_paused = true)]
async fn test_failures_are_isolated() {
    let transport = MockTransport::new(|request| {
        let idx = index_of(request);
        let response = match idx {
            1 => Err(EvaluationError::transport(EVALUATE_PATH, "connection reset")),
            3 => Ok(ApiResponse::new(500, "internal error")),
            4 => ok_envelope("I could not decide"),
            _ => ok_envelope(&evaluator_output(idx)),
        };
        (Duration::from_millis(20), response)
    });
    let processor = processor(transport, Duration::from_secs(30));

    let outcomes = processor.evaluate_batch(&requests(6)).await;

    assert_eq!(outcomes.len(), 6);
    let successes: Vec<bool> = outcomes.iter().map(|o| o.is_success()).collect();
    assert_eq!(successes, vec![true, false, true, false, false, true]);
    assert!(outcomes[1].error().unwrap().contains("connection reset"));
    assert!(outcomes[3].error().unwrap().contains("HTTP error 500"));
    assert_eq!(outcomes[4].error(), Some("could not parse evaluator response as JSON"));
    assert_eq!(outcomes[1].metadata().processing_time_ms, 20);
    assert_eq!(outcomes[5].result().unwrap().score, 5);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_request_inside_batch_keeps_alignment() {
    let transport = MockTransport::new(|request| {
        (Duration::from_millis(10), ok_envelope(&evaluator_output(index_of(request))))
    });
    let processor = processor(transport, Duration::from_secs(30));

    let mut batch = requests(3);
    batch[1].user_trace.truncate(2);

    let outcomes = processor.evaluate_batch(&batch).await;

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].is_success());
    assert!(outcomes[1].error().unwrap().contains("too few points"));
    assert_eq!(outcomes[1].metadata().processing_time_ms, 0);
    assert_eq!(outcomes[2].result().unwrap().score, 2);
    assert_eq!(processor.evaluator().client().transport().started().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_hung_dispatch_times_out() {
    let transport = MockTransport::new(|request| {
        (Duration::from_secs(600), ok_envelope(&evaluator_output(index_of(request))))
    });
    let processor = processor(transport, Duration::from_secs(5));

    let outcomes = processor.evaluate_batch(&requests(2)).await;

    for outcome in &outcomes {
        assert!(outcome.error().unwrap().contains("timed out after 5000ms"));
        assert_eq!(outcome.metadata().processing_time_ms, 5000);
    }
}

#[tokio::test(start_paused = true)]
async fn test_cancel_between_groups() {
    let transport = MockTransport::new(|request| {
        (Duration::from_millis(100), ok_envelope(&evaluator_output(index_of(request))))
    });
    let processor = processor(transport, Duration::from_secs(30));
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        trigger.cancel();
    });

    let outcomes = processor
        .evaluate_batch_with_cancel(&requests(12), &cancel)
        .await;

    assert_eq!(outcomes.len(), 12);
    assert!(outcomes[..10].iter().all(|o| o.is_success()));
    assert!(outcomes[10..]
        .iter()
        .all(|o| o.error() == Some("evaluation cancelled")));
    assert_eq!(processor.evaluator().client().transport().started().len(), 10);
}

#[tokio::test]
async fn test_availability_false_when_unreachable() {
    let client = ApiClient::new(
        HttpTransport::new("http://127.0.0.1:1"),
        StaticToken::new("token"),
        Duration::from_secs(5),
    );
    let evaluator = Evaluator::new(client, ModelSettings::from(&Config::default()));

    assert!(!evaluator.check_availability().await);
    assert!(evaluator.get_statistics().await.is_none());
}

#[tokio::test]
async fn test_probes_against_mock_service() {
    let transport = MockTransport::new(|request| {
        let response = match request.path.as_str() {
            STATUS_PATH => ApiResponse::new(200, "{\"status\":\"ok\"}"),
            STATS_PATH => ApiResponse::new(
                200,
                json!({
                    "success": true,
                    "data": {
                        "totalEvaluations": 12,
                        "averageProcessingTimeMs": 850.5,
                        "tokensUsed": 9000,
                        "lastEvaluationTimestamp": "2026-10-19T09:30:00.000Z"
                    }
                })
                .to_string(),
            ),
            _ => ApiResponse::new(404, ""),
        };
        (Duration::ZERO, Ok(response))
    });
    let evaluator = Evaluator::new(
        ApiClient::new(transport, StaticToken::new("token"), Duration::from_secs(5)),
        ModelSettings::from(&Config::default()),
    );

    assert!(evaluator.check_availability().await);
    let stats = evaluator.get_statistics().await.unwrap();
    assert_eq!(stats.total_evaluations, 12);
    assert_eq!(stats.tokens_used, 9000);
    assert_eq!(
        stats.last_evaluation_timestamp.as_deref(),
        Some("2026-10-19T09:30:00.000Z")
    );
}

#[tokio::test]
async fn test_probes_on_error_status() {
    let transport = MockTransport::new(|_| (Duration::ZERO, Ok(ApiResponse::new(503, "down"))));
    let evaluator = Evaluator::new(
        ApiClient::new(transport, StaticToken::new("token"), Duration::from_secs(5)),
        ModelSettings::from(&Config::default()),
    );

    assert!(!evaluator.check_availability().await);
    assert!(evaluator.get_statistics().await.is_none());
}

#[test]
fn test_validate_then_format_round_trip() {
    let raw = r#"```json
{
  "score": 77,
  "analysis": "Mostly closed square",
  "detectedShape": "square",
  "precision": 0.8,
  "coverage": 0.9,
  "suggestions": ["Practice corners", "Trace slower"],
  "details": {
    "similarity": 0.7,
    "errors": ["Gap at top-left", "Uneven sides"],
    "strengths": ["Good size", "Steady line"]
  }
}
```"#;

    let result = validate(raw).unwrap();
    let summary = format_summary(&result);

    assert!(summary.contains("77"));
    assert!(summary.contains("square"));
    for group in [
        ["• Practice corners", "• Trace slower"],
        ["• Gap at top-left", "• Uneven sides"],
        ["• Good size", "• Steady line"],
    ] {
        let first = summary.find(group[0]).unwrap();
        let second = summary.find(group[1]).unwrap();
        assert!(first < second);
    }
}
