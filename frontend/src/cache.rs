//! 查询缓存模块
//!
//! 显式的 key -> (响应体, 标签集合) 映射：
//! - 查询成功后写入缓存并登记其提供的标签
//! - 变更成功后按标签失效，下次读取时重新请求
//! - 每个请求持有单调递增的票据，过期响应不会覆盖较新的缓存
//! - 超出容量时淘汰最久未读取的缓存项

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

// =========================================================
// 缓存标签 (Cache Tags)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Route,
    Order,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagId {
    Entity(u64),
    List,
}

/// 缓存标签，如 `Route`、`Route:7`、`Order:LIST`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheTag {
    pub kind: TagKind,
    pub id: Option<TagId>,
}

impl CacheTag {
    /// 类型级标签，失效时覆盖该类型的所有标签
    pub const fn kind(kind: TagKind) -> Self {
        Self { kind, id: None }
    }

    pub const fn entity(kind: TagKind, id: u64) -> Self {
        Self {
            kind,
            id: Some(TagId::Entity(id)),
        }
    }

    pub const fn list(kind: TagKind) -> Self {
        Self {
            kind,
            id: Some(TagId::List),
        }
    }

    /// 变更声明的标签是否覆盖缓存项提供的标签
    ///
    /// 不带 id 的标签覆盖同类型的全部标签；带 id 的标签只覆盖完全相同的标签。
    pub fn covers(&self, provided: &CacheTag) -> bool {
        self.kind == provided.kind && (self.id.is_none() || self.id == provided.id)
    }
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            TagKind::Route => "Route",
            TagKind::Order => "Order",
        };
        match self.id {
            None => write!(f, "{}", kind),
            Some(TagId::Entity(id)) => write!(f, "{}:{}", kind, id),
            Some(TagId::List) => write!(f, "{}:LIST", kind),
        }
    }
}

// =========================================================
// 缓存存储 (Cache Storage)
// =========================================================

/// 缓存键：(端点名, 序列化后的参数)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub endpoint: &'static str,
    pub params: String,
}

impl CacheKey {
    pub fn new(endpoint: &'static str, params: impl Into<String>) -> Self {
        Self {
            endpoint,
            params: params.into(),
        }
    }
}

/// 请求票据，按发出顺序单调递增
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// 默认容量：搜索框每次输入都会产生新的键
pub const DEFAULT_CAPACITY: usize = 64;

struct CacheEntry {
    body: Rc<[u8]>,
    tags: Vec<CacheTag>,
    ticket: Ticket,
    last_used: u64,
}

pub struct QueryCache {
    entries: HashMap<CacheKey, CacheEntry>,
    capacity: usize,
    // 读写时钟，用于 LRU 淘汰
    clock: u64,
    last_ticket: u64,
    /// 最近一次失效时已发出的最大票据
    invalidated_through: u64,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 容量至少为 1
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            clock: 0,
            last_ticket: 0,
            invalidated_through: 0,
        }
    }

    /// 读取缓存，命中时刷新其最近使用时间
    pub fn get(&mut self, key: &CacheKey) -> Option<Rc<[u8]>> {
        self.clock += 1;
        let now = self.clock;
        self.entries.get_mut(key).map(|e| {
            e.last_used = now;
            Rc::clone(&e.body)
        })
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 发出请求前领取票据
    pub fn begin(&mut self) -> Ticket {
        self.last_ticket += 1;
        Ticket(self.last_ticket)
    }

    /// 写入响应
    ///
    /// 以下情况不写入并返回 false：
    /// - 请求发出后发生过失效（响应可能已过期）
    /// - 缓存中已有更新的票据写入的响应
    pub fn store(
        &mut self,
        key: CacheKey,
        ticket: Ticket,
        body: Rc<[u8]>,
        tags: Vec<CacheTag>,
    ) -> bool {
        if ticket.0 <= self.invalidated_through {
            return false;
        }
        if let Some(existing) = self.entries.get(&key) {
            if existing.ticket > ticket {
                return false;
            }
        }
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_least_recent();
        }
        self.clock += 1;
        let entry = CacheEntry {
            body,
            tags,
            ticket,
            last_used: self.clock,
        };
        self.entries.insert(key, entry);
        true
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_used)
            .map(|(k, _)| k.clone());
        if let Some(key) = oldest {
            log::debug!("[Cache] evicting {} {}", key.endpoint, key.params);
            self.entries.remove(&key);
        }
    }

    /// 失效所有与给定标签相交的缓存项，返回被移除的数量
    pub fn invalidate(&mut self, tags: &[CacheTag]) -> usize {
        self.invalidated_through = self.last_ticket;
        let before = self.entries.len();
        self.entries.retain(|_, entry| {
            !entry
                .tags
                .iter()
                .any(|provided| tags.iter().any(|t| t.covers(provided)))
        });
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.invalidated_through = self.last_ticket;
        self.entries.clear();
    }
}
