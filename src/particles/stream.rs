//! 粒子流与双缓冲管理
//!
//! 两条粒子流交替充当读端和写端：模拟阶段读取当前流、向下一条流追加输出，
//! 完成后交换角色。`split` 同时借出只读端和可写端，借用检查保证两者永不别名。
//!
//! ```text
//!   frame N                         frame N+1
//! ┌────────────┐  stream_out   ┌────────────┐
//! │  current   │──────────────►│    next    │
//! │ (read-only)│               │(append-only)│
//! └────────────┘               └────────────┘
//!        ▲                            │
//!        └────────── swap() ──────────┘
//! ```

use super::particle::Particle;
use super::simulate::StepOutcome;
use rayon::prelude::*;

/// 只追加的有界粒子流
///
/// 超出容量的追加被静默丢弃并计数，属于降级而非错误。
#[derive(Debug, Clone)]
pub struct ParticleStream {
    particles: Vec<Particle>,
    capacity: usize,
    dropped: usize,
}

impl ParticleStream {
    /// 创建指定容量的空流
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: Vec::new(),
            capacity,
            dropped: 0,
        }
    }

    /// 追加一个粒子，满时丢弃并返回 `false`
    pub fn append(&mut self, particle: Particle) -> bool {
        if self.particles.len() < self.capacity {
            self.particles.push(particle);
            true
        } else {
            self.dropped += 1;
            false
        }
    }

    /// 批量追加，返回实际写入的数量
    pub fn append_all<I>(&mut self, particles: I) -> usize
    where
        I: IntoIterator<Item = Particle>,
    {
        let before = self.particles.len();
        for particle in particles {
            self.append(particle);
        }
        self.particles.len() - before
    }

    /// 清空内容和丢弃计数
    pub fn clear(&mut self) {
        self.particles.clear();
        self.dropped = 0;
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 自上次清空以来被丢弃的追加数
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// 流中的火花数
    pub fn flare_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_flare()).count()
    }
}

/// 双缓冲（乒乓）粒子流
#[derive(Debug, Clone)]
pub struct StreamBuffers {
    streams: [ParticleStream; 2],
    current: usize,
}

impl StreamBuffers {
    /// 创建两条等容量的空流
    pub fn new(capacity: usize) -> Self {
        Self {
            streams: [
                ParticleStream::with_capacity(capacity),
                ParticleStream::with_capacity(capacity),
            ],
            current: 0,
        }
    }

    /// 用初始粒子替换当前流（通常只有一个发射器）
    pub fn seed<I>(&mut self, particles: I)
    where
        I: IntoIterator<Item = Particle>,
    {
        let stream = &mut self.streams[self.current];
        stream.clear();
        stream.append_all(particles);
        self.streams[1 - self.current].clear();
    }

    /// 本帧的只读流（模拟输入和渲染输入）
    pub fn current_stream(&self) -> &ParticleStream {
        &self.streams[self.current]
    }

    /// 本帧模拟输出的写入目标
    pub fn next_stream(&mut self) -> &mut ParticleStream {
        &mut self.streams[1 - self.current]
    }

    /// 同时借出读端和写端
    pub fn split(&mut self) -> (&ParticleStream, &mut ParticleStream) {
        let (first, second) = self.streams.split_at_mut(1);
        if self.current == 0 {
            (&first[0], &mut second[0])
        } else {
            (&second[0], &mut first[0])
        }
    }

    /// 交换读写角色
    pub fn swap(&mut self) {
        self.current = 1 - self.current;
    }

    pub fn capacity(&self) -> usize {
        self.streams[0].capacity()
    }
}

/// 一次流输出的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamOutReport {
    /// 规则产生的粒子总数
    pub produced: usize,
    /// 实际写入输出流的粒子数
    pub appended: usize,
    /// 因容量不足丢弃的粒子数
    pub dropped: usize,
    /// 新生成的火花数
    pub spawned: usize,
    /// 剔除的火花数
    pub culled: usize,
}

/// 每个工作线程的局部输出块
#[derive(Default)]
struct StreamChunk {
    emitters: Vec<Particle>,
    particles: Vec<Particle>,
    spawned: usize,
    culled: usize,
}

/// 并行 map-then-concatenate 原语
///
/// 每个工作线程把自己负责的粒子展开到局部块中，互不共享可变状态；
/// rayon 的 join 返回后所有块都已完成，再按块拼接进输出流。
/// 输出流在写入前清空，块之间的顺序不作保证。
/// 发射器先于火花写入，容量耗尽时只丢弃火花。
pub fn stream_out<F>(input: &[Particle], output: &mut ParticleStream, expand: F) -> StreamOutReport
where
    F: Fn(&Particle) -> StepOutcome + Sync + Send,
{
    let chunks: Vec<StreamChunk> = input
        .par_iter()
        .fold(StreamChunk::default, |mut chunk, particle| {
            let outcome = expand(particle);
            chunk.spawned += outcome.spawned();
            chunk.culled += outcome.culled();
            for p in outcome {
                if p.is_emitter() {
                    chunk.emitters.push(p);
                } else {
                    chunk.particles.push(p);
                }
            }
            chunk
        })
        .collect();

    output.clear();
    let mut report = StreamOutReport::default();
    for chunk in &chunks {
        report.produced += chunk.emitters.len() + chunk.particles.len();
        report.spawned += chunk.spawned;
        report.culled += chunk.culled;
        report.appended += output.append_all(chunk.emitters.iter().copied());
    }
    for chunk in chunks {
        report.appended += output.append_all(chunk.particles);
    }
    report.dropped = output.dropped();
    report
}
