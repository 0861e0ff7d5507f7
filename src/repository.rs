/*
 *
 *  *
 *  *      Copyright (c) 2018-2025, SnackCloud All rights reserved.
 *  *
 *  *   Redistribution and use in source and binary forms, with or without
 *  *   modification, are permitted provided that the following conditions are met:
 *  *
 *  *   Redistributions of source code must retain the above copyright notice,
 *  *   this list of conditions and the following disclaimer.
 *  *   Redistributions in binary form must reproduce the above copyright
 *  *   notice, this list of conditions and the following disclaimer in the
 *  *   documentation and/or other materials provided with the distribution.
 *  *   Neither the name of the www.snackcloud.cn developer nor the names of its
 *  *   contributors may be used to endorse or promote products derived from
 *  *   this software without specific prior written permission.
 *  *   Author: SnackCloud
 *  *
 *
 */

//!
//! Member search: dynamically filtered, paginated queries over members
//! left-joined to their teams.
//!
//! Every filter field is optional. An absent or blank field contributes no
//! condition, so an all-empty search matches every member, including members
//! with no team.
//!
use crate::database::DatabasePlatform;
use crate::dto::MemberTeamDto;
use crate::errors::Result;
use crate::mapper::{Page, PageRequest};
use crate::shiba::Shiba;
use crate::sql::{SqlBuilder, SqliteBuilder};
use crate::value::FromValue;
use crate::wrapper::Wrapper;

static BUILDER: SqliteBuilder = SqliteBuilder { version: None };

/// The optional search fields. Any subset may be populated; no invariant
/// couples them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberSearchCondition {
    pub username: Option<String>,
    pub team_name: Option<String>,
    pub age_goe: Option<i32>,
    pub age_loe: Option<i32>,
}

impl MemberSearchCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username<S: Into<String>>(mut self, username: S) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn team_name<S: Into<String>>(mut self, team_name: S) -> Self {
        self.team_name = Some(team_name.into());
        self
    }

    pub fn age_goe(mut self, age: i32) -> Self {
        self.age_goe = Some(age);
        self
    }

    pub fn age_loe(mut self, age: i32) -> Self {
        self.age_loe = Some(age);
        self
    }

    // One total function per field: an absent value returns the wrapper
    // untouched, so any chain of these is safe to compose.

    fn username_eq(&self, wrapper: Wrapper) -> Wrapper {
        wrapper.eq("m.username", self.username.clone())
    }

    fn team_name_eq(&self, wrapper: Wrapper) -> Wrapper {
        wrapper.eq("t.name", self.team_name.clone())
    }

    fn age_goe_filter(&self, wrapper: Wrapper) -> Wrapper {
        wrapper.ge("m.age", self.age_goe)
    }

    fn age_loe_filter(&self, wrapper: Wrapper) -> Wrapper {
        wrapper.le("m.age", self.age_loe)
    }

    /// AND-fold of every present filter. With nothing present the wrapper
    /// comes back unchanged and matches everything.
    pub fn all_eq(&self, wrapper: Wrapper) -> Wrapper {
        let wrapper = self.username_eq(wrapper);
        let wrapper = self.team_name_eq(wrapper);
        let wrapper = self.age_goe_filter(wrapper);
        self.age_loe_filter(wrapper)
    }
}

/// Member search queries. Stateless apart from the database handle; every
/// call is an independent read.
pub struct MemberRepository {
    shiba: Shiba,
}

impl MemberRepository {
    pub fn new(shiba: Shiba) -> Self {
        MemberRepository { shiba }
    }

    /// All matching rows in `member_id` order. Members without a team keep
    /// their row, with the team columns null.
    pub fn search(&self, condition: &MemberSearchCondition) -> Result<Vec<MemberTeamDto>> {
        let mut conn = self.shiba.acquire()?;
        Self::fetch(&mut conn, Self::search_wrapper(condition))
    }

    /// One page plus the total, counting unconditionally before the fetch.
    pub fn search_page(
        &self,
        condition: &MemberSearchCondition,
        offset: i64,
        size: i64,
    ) -> Result<Page<MemberTeamDto>> {
        let request = PageRequest::new(offset, size)?;
        let mut conn = self.shiba.acquire()?;

        let total = Self::fetch_total(&mut conn, condition)?;
        let records = if total > 0 {
            let wrapper = Self::search_wrapper(condition)
                .limit(request.size)
                .offset(request.offset);
            Self::fetch(&mut conn, wrapper)?
        } else {
            vec![]
        };
        Ok(Page::new(request.offset, request.size, total, records))
    }

    /// One page plus the total, skipping the count statement when the page
    /// itself already proves there is no more data: a first page that came
    /// back short IS the full result set.
    pub fn search_page_optimized_count(
        &self,
        condition: &MemberSearchCondition,
        offset: i64,
        size: i64,
    ) -> Result<Page<MemberTeamDto>> {
        let request = PageRequest::new(offset, size)?;
        let mut conn = self.shiba.acquire()?;

        let wrapper = Self::search_wrapper(condition)
            .limit(request.size)
            .offset(request.offset);
        let records = Self::fetch(&mut conn, wrapper)?;

        let fetched = records.len() as u64;
        let total = if request.offset == 0 && fetched < request.size {
            fetched
        } else {
            Self::fetch_total(&mut conn, condition)?
        };
        Ok(Page::new(request.offset, request.size, total, records))
    }

    /// The one place the filtered left-join query is assembled; all three
    /// entry points reuse it. Ordering is pinned so pages are deterministic.
    fn search_wrapper(condition: &MemberSearchCondition) -> Wrapper {
        let wrapper = Wrapper::new()
            .table("member")
            .alias("m")
            .select(vec![
                "m.id AS member_id",
                "m.username",
                "m.age",
                "t.id AS team_id",
                "t.name AS team_name",
            ])
            .left_join("team t", "m.team_id = t.id");
        condition.all_eq(wrapper).order_by_asc(vec!["m.id"])
    }

    fn fetch(conn: &mut DatabasePlatform, wrapper: Wrapper) -> Result<Vec<MemberTeamDto>> {
        let (sql, params) = BUILDER.build_query_sql(&wrapper)?;
        let rows = conn.execute_result(&sql, params.into())?;
        rows.object_iter()
            .map(|obj| MemberTeamDto::from_value_opt(&obj))
            .collect()
    }

    fn fetch_total(conn: &mut DatabasePlatform, condition: &MemberSearchCondition) -> Result<u64> {
        let wrapper = condition.all_eq(
            Wrapper::new()
                .table("member")
                .alias("m")
                .left_join("team t", "m.team_id = t.id"),
        );
        let (sql, params) = BUILDER.build_count_sql(&wrapper)?;
        let rows = conn.execute_result(&sql, params.into())?;
        match rows.iter().next().and_then(|row| row.as_ref(0).cloned()) {
            Some(value) => u64::from_value_opt(&value),
            None => Ok(0),
        }
    }
}
