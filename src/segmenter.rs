//! 文档分段模块
//!
//! 按行扫描文档，以 ```` ``` ```` 开头的行为边界，把内容切分为交替出现的正文片段和代码块片段。

use crate::types::{Segment, SegmentKind, FENCE_MARKER};

/// 围栏状态
///
/// | 当前状态 | 围栏行 | 动作 |
/// |---|---|---|
/// | `Prose` | 是 | 输出缓冲区中的正文，用围栏行重新开始缓冲，进入 `Code` |
/// | `Code`  | 是 | 追加围栏行，输出整个代码块，回到 `Prose` |
/// | 任意    | 否 | 追加该行 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FenceState {
    #[default]
    Prose,
    Code,
}

/// 行级分段器
///
/// 逐行调用 [`Segmenter::push_line`]，读完后调用 [`Segmenter::finish`] 取出剩余内容。
#[derive(Debug, Default)]
pub struct Segmenter {
    buffer: String,
    state: FenceState,
}

impl Segmenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FenceState {
        self.state
    }

    /// 输入一行（不含换行符），如果这一行结束了一个片段则返回该片段
    pub fn push_line(&mut self, line: &str) -> Option<Segment> {
        let is_fence = line.starts_with(FENCE_MARKER);

        match (self.state, is_fence) {
            (FenceState::Prose, true) => {
                let prose = self.take(SegmentKind::Prose);
                self.append(line);
                self.state = FenceState::Code;
                prose
            }
            (FenceState::Code, true) => {
                self.append(line);
                self.state = FenceState::Prose;
                self.take(SegmentKind::Code)
            }
            (_, false) => {
                self.append(line);
                None
            }
        }
    }

    /// 输出缓冲区中剩余的内容
    ///
    /// 文件在未闭合的代码块中结束时，剩余内容作为代码块输出。
    pub fn finish(mut self) -> Option<Segment> {
        let kind = match self.state {
            FenceState::Prose => SegmentKind::Prose,
            FenceState::Code => SegmentKind::Code,
        };
        self.take(kind)
    }

    fn append(&mut self, line: &str) {
        self.buffer.push_str(line);
        self.buffer.push('\n');
    }

    fn take(&mut self, kind: SegmentKind) -> Option<Segment> {
        if self.buffer.is_empty() {
            return None;
        }
        Some(Segment {
            content: std::mem::take(&mut self.buffer),
            kind,
        })
    }
}

/// 把整段文本切分为片段
pub fn segment_text(text: &str) -> Vec<Segment> {
    let mut segmenter = Segmenter::new();
    let mut segments: Vec<Segment> =
        text.lines().filter_map(|line| segmenter.push_line(line)).collect();
    segments.extend(segmenter.finish());
    segments
}
