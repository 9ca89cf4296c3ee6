//! 文档翻译模块
//!
//! 读取源文件，逐个片段调用翻译服务，并把结果按原顺序写入 `.en` 译本。
//! 片段严格串行处理：上一个片段的翻译完成后才会读取下一行。

use crate::error::{Result, TranslationError};
use crate::segmenter::Segmenter;
use crate::translator::Translate;
use crate::types::{FileReport, Segment, SegmentKind, SegmentStats};
use std::borrow::Cow;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter,
};
use tracing::{debug, info, warn};

/// 单个文件的处理选项
#[derive(Debug, Clone)]
pub struct TranslateOptions {
    /// 代码块是否也发送给翻译服务，为 `false` 时原样写入
    pub translate_code_blocks: bool,
    /// 是否把每个译文片段打印到标准输出
    pub echo: bool,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            translate_code_blocks: true,
            echo: true,
        }
    }
}

/// 翻译单个文件
///
/// 译本会被重新创建（覆盖旧内容）。翻译失败时立即返回错误，
/// 已经写入的片段保留在磁盘上，不做回滚。
pub async fn translate_file<T: Translate>(
    translator: &T,
    source: &Path,
    target: &Path,
    options: &TranslateOptions,
) -> Result<FileReport> {
    let input = File::open(source)
        .await
        .map_err(|e| TranslationError::io(source, e))?;
    let output = File::create(target)
        .await
        .map_err(|e| TranslationError::io(target, e))?;

    let mut stats = SegmentStats::default();
    let mut writer = BufWriter::new(output);
    let result = pump(
        translator,
        BufReader::new(input),
        &mut writer,
        &mut stats,
        options,
        (source, target),
    )
    .await;

    // 出错时也要把已写入的片段刷到磁盘
    let flushed = writer
        .flush()
        .await
        .map_err(|e| TranslationError::io(target, e));

    match result {
        Ok(()) => {
            flushed?;
            info!(
                source = %source.display(),
                target = %target.display(),
                segments = stats.segments,
                "file translated"
            );
            Ok(FileReport {
                source: source.to_path_buf(),
                target: target.to_path_buf(),
                stats,
            })
        }
        Err(e) => {
            if let Err(flush_err) = flushed {
                warn!(error = %flush_err, "failed to flush partial output");
            }
            Err(e)
        }
    }
}

/// 从 `reader` 读取文档并把译文写入 `writer`，返回片段计数
///
/// 不合法的 UTF-8 字节按替换字符处理，不会中止翻译。
pub async fn translate_stream<T, R, W>(
    translator: &T,
    reader: R,
    writer: &mut W,
    options: &TranslateOptions,
) -> Result<SegmentStats>
where
    T: Translate,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut stats = SegmentStats::default();
    let labels = (Path::new("<input>"), Path::new("<output>"));
    pump(translator, reader, writer, &mut stats, options, labels).await?;
    Ok(stats)
}

/// `paths` 为 (源, 译本)，仅用于错误信息
async fn pump<T, R, W>(
    translator: &T,
    mut reader: R,
    writer: &mut W,
    stats: &mut SegmentStats,
    options: &TranslateOptions,
    paths: (&Path, &Path),
) -> Result<()>
where
    T: Translate,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (source, target) = paths;
    let mut segmenter = Segmenter::new();
    let mut raw = Vec::new();

    loop {
        raw.clear();
        let read = reader
            .read_until(b'\n', &mut raw)
            .await
            .map_err(|e| TranslationError::io(source, e))?;
        if read == 0 {
            break;
        }

        let flushed = segmenter.push_line(&decode_line(&raw));
        if let Some(segment) = flushed {
            emit(translator, segment, writer, stats, options, target).await?;
        }
    }

    if let Some(segment) = segmenter.finish() {
        emit(translator, segment, writer, stats, options, target).await?;
    }

    Ok(())
}

/// 去掉行尾的 `\n` / `\r\n`
fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line)
}

async fn emit<T, W>(
    translator: &T,
    segment: Segment,
    writer: &mut W,
    stats: &mut SegmentStats,
    options: &TranslateOptions,
    target: &Path,
) -> Result<()>
where
    T: Translate,
    W: AsyncWrite + Unpin,
{
    let kind = segment.kind;
    debug!(
        index = stats.segments + 1,
        kind = ?kind,
        chars = segment.content.len(),
        "segment ready"
    );

    let text = if kind == SegmentKind::Code && !options.translate_code_blocks {
        segment.content
    } else {
        translator.translate(&segment.content).await?
    };

    writer
        .write_all(text.as_bytes())
        .await
        .map_err(|e| TranslationError::io(target, e))?;
    writer
        .write_all(b"\n")
        .await
        .map_err(|e| TranslationError::io(target, e))?;

    if options.echo {
        println!("{}", text);
    }

    stats.record(kind);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::Mutex;

    /// 记录每次调用，并按配置在第 N 次调用时失败
    struct RecordingTranslator {
        calls: Mutex<Vec<String>>,
        fail_on: Option<usize>,
    }

    impl RecordingTranslator {
        fn new() -> Self {
            Self { calls: Mutex::new(Vec::new()), fail_on: None }
        }

        fn failing_on(call: usize) -> Self {
            Self { calls: Mutex::new(Vec::new()), fail_on: Some(call) }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Translate for RecordingTranslator {
        fn translate(&self, text: &str) -> impl Future<Output = Result<String>> + Send {
            let mut calls = self.calls.lock().unwrap();
            calls.push(text.to_string());
            let result = if Some(calls.len()) == self.fail_on {
                Err(TranslationError::Api { status: 500, message: "boom".to_string() })
            } else {
                Ok(format!("EN[{}]", text.trim_end()))
            };
            async move { result }
        }
    }

    fn quiet() -> TranslateOptions {
        TranslateOptions { echo: false, ..TranslateOptions::default() }
    }

    #[test]
    fn three_segments_translated_in_order() {
        let translator = RecordingTranslator::new();
        let mut out: Vec<u8> = Vec::new();

        let stats = tokio_test::block_on(translate_stream(
            &translator,
            "line1\n```\ncode1\n```\nline2\n".as_bytes(),
            &mut out,
            &quiet(),
        ))
        .unwrap();

        assert_eq!(translator.calls(), vec!["line1\n", "```\ncode1\n```\n", "line2\n"]);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "EN[line1]\nEN[```\ncode1\n```]\nEN[line2]\n"
        );
        assert_eq!(stats.segments, 3);
        assert_eq!(stats.prose_segments, 2);
        assert_eq!(stats.code_segments, 1);
    }

    #[test]
    fn code_blocks_can_be_kept_verbatim() {
        let translator = RecordingTranslator::new();
        let mut out: Vec<u8> = Vec::new();
        let options = TranslateOptions { translate_code_blocks: false, echo: false };

        tokio_test::block_on(translate_stream(
            &translator,
            "说明\n```json\n{\"a\": 1}\n```\n".as_bytes(),
            &mut out,
            &options,
        ))
        .unwrap();

        assert_eq!(translator.calls(), vec!["说明\n"]);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "EN[说明]\n```json\n{\"a\": 1}\n```\n\n"
        );
    }

    #[test]
    fn crlf_lines_are_normalized() {
        let translator = RecordingTranslator::new();
        let mut out: Vec<u8> = Vec::new();

        tokio_test::block_on(translate_stream(
            &translator,
            "a\r\nb\r\n".as_bytes(),
            &mut out,
            &quiet(),
        ))
        .unwrap();

        assert_eq!(translator.calls(), vec!["a\nb\n"]);
    }

    #[test]
    fn stream_stops_at_first_failure() {
        let translator = RecordingTranslator::failing_on(2);
        let mut out: Vec<u8> = Vec::new();

        let result = tokio_test::block_on(translate_stream(
            &translator,
            "line1\n```\ncode1\n```\nline2\n".as_bytes(),
            &mut out,
            &quiet(),
        ));

        assert!(matches!(result, Err(TranslationError::Api { status: 500, .. })));
        assert_eq!(translator.calls().len(), 2);
        assert_eq!(String::from_utf8(out).unwrap(), "EN[line1]\n");
    }

    #[test]
    fn invalid_utf8_is_translated_as_text() {
        let translator = RecordingTranslator::new();
        let mut out: Vec<u8> = Vec::new();

        let stats = tokio_test::block_on(translate_stream(
            &translator,
            &b"intro\n\xd6\xd0\xce\xc4\n```\n\xff\n```\n"[..],
            &mut out,
            &quiet(),
        ))
        .unwrap();

        assert_eq!(stats.segments, 2);
        assert_eq!(
            translator.calls(),
            vec!["intro\n\u{fffd}\u{fffd}\u{fffd}\u{fffd}\n", "```\n\u{fffd}\n```\n"]
        );
    }

    #[test]
    fn last_line_without_newline_is_kept() {
        let translator = RecordingTranslator::new();
        let mut out: Vec<u8> = Vec::new();

        tokio_test::block_on(translate_stream(&translator, "a\nb".as_bytes(), &mut out, &quiet()))
            .unwrap();

        assert_eq!(translator.calls(), vec!["a\nb\n"]);
    }

    #[tokio::test]
    async fn gbk_file_still_produces_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("legacy.md");
        let target = dir.path().join("legacy.en.md");
        std::fs::write(&source, b"intro\n\xd6\xd0\xce\xc4\n").unwrap();

        let translator = RecordingTranslator::new();
        let report = translate_file(&translator, &source, &target, &quiet()).await.unwrap();

        assert_eq!(report.stats.segments, 1);
        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            "EN[intro\n\u{fffd}\u{fffd}\u{fffd}\u{fffd}]\n"
        );
    }

    #[tokio::test]
    async fn failed_file_keeps_first_segment_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("restapi.md");
        let target = dir.path().join("restapi.en.md");
        std::fs::write(&source, "line1\n```\ncode1\n```\nline2\n").unwrap();
        std::fs::write(&target, "stale content that must disappear\n").unwrap();

        let translator = RecordingTranslator::failing_on(2);
        let result = translate_file(&translator, &source, &target, &quiet()).await;

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "EN[line1]\n");
    }

    #[tokio::test]
    async fn translate_file_writes_target() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("data.json");
        let target = dir.path().join("data.en.json");
        std::fs::write(&source, "{\"title\": \"标题\"}\n").unwrap();

        let translator = RecordingTranslator::new();
        let report = translate_file(&translator, &source, &target, &quiet()).await.unwrap();

        assert_eq!(report.stats.segments, 1);
        assert_eq!(report.target, target);
        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            "EN[{\"title\": \"标题\"}]\n"
        );
    }

    #[tokio::test]
    async fn missing_source_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("missing.md");
        let target = dir.path().join("missing.en.md");

        let translator = RecordingTranslator::new();
        let err = translate_file(&translator, &source, &target, &quiet()).await.unwrap_err();

        assert!(matches!(err, TranslationError::Io { ref path, .. } if path == &source));
        assert!(!target.exists());
        assert!(translator.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_file_produces_empty_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("empty.md");
        let target = dir.path().join("empty.en.md");
        std::fs::write(&source, "").unwrap();

        let translator = RecordingTranslator::new();
        let report = translate_file(&translator, &source, &target, &quiet()).await.unwrap();

        assert_eq!(report.stats, SegmentStats::default());
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "");
    }
}
