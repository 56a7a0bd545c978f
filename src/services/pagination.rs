//! 分页
//!
//! 页码容错：缺失、非数字或小于 1 的页码取第一页，超出末页取末页。

use serde::{Deserialize, Serialize};

/// 分页参数
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// 页码（从 1 开始）
    pub page: usize,
    /// 每页数量
    pub page_size: usize,
}

impl Pagination {
    /// 创建新分页参数
    pub fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }

    /// 根据原始页码和总数解析出实际页
    pub fn resolve(raw_page: Option<&str>, page_size: usize, total: u64) -> Self {
        let page_size = page_size.max(1);
        let num_pages = Self::num_pages_for(total, page_size);
        let page = raw_page
            .and_then(|p| p.trim().parse::<usize>().ok())
            .filter(|p| *p > 0)
            .map(|p| p.min(num_pages))
            .unwrap_or(1);
        Self { page, page_size }
    }

    /// 计算偏移量
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1)) * self.page_size
    }

    /// 总页数，空结果也有一页
    pub fn num_pages_for(total: u64, page_size: usize) -> usize {
        let page_size = page_size.max(1) as u64;
        (total.div_ceil(page_size)).max(1) as usize
    }
}

/// 一页结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// 当前页码
    pub number: usize,
    /// 总页数
    pub num_pages: usize,
    /// 总条数
    pub total: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(pagination: Pagination, total: u64, items: Vec<T>) -> Self {
        let num_pages = Pagination::num_pages_for(total, pagination.page_size);
        Self {
            number: pagination.page,
            num_pages,
            total,
            has_next: pagination.page < num_pages,
            has_previous: pagination.page > 1,
            items,
        }
    }

    /// 转换条目类型
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
            has_next: self.has_next,
            has_previous: self.has_previous,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}
