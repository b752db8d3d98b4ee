/// Fixed-size client-side paging over an already loaded list.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    pub page_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based, clamped into `1..=page_count` (page 1 when empty).
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
    /// Index of the first item in the full list; the "NO" column counts from here.
    pub offset: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    pub fn paginate<T: Clone>(&self, items: &[T], requested: usize) -> Page<T> {
        let total = items.len();
        let page_count = self.page_count(total);
        let page = requested.clamp(1, page_count.max(1));
        let offset = ((page - 1) * self.page_size).min(total);
        let end = (offset + self.page_size).min(total);

        Page {
            items: items[offset..end].to_vec(),
            page,
            page_count,
            total,
            offset,
        }
    }
}

impl<T> Page<T> {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }

    /// A single page (or none) needs no pager.
    pub fn show_controls(&self) -> bool {
        self.page_count > 1
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn page_numbers(&self) -> Vec<usize> {
        (1..=self.page_count).collect()
    }
}
