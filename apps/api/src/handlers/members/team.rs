use super::*;

pub async fn list_team_members_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    Path((organization_id, team_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<MemberResponseDto>>> {
    let page = state
        .team_service
        .list_members(
            user.id,
            OrganizationId::from_uuid(organization_id),
            TeamId::from_uuid(team_id),
            PageRequest::try_from(query)?,
        )
        .await?
        .map(MemberResponseDto::from);

    Ok(Json(page))
}

pub async fn add_team_members_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    Path((organization_id, team_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<AddMembersRequest>,
) -> ApiResult<Json<Vec<MemberOutcomeResponse>>> {
    let outcomes = state
        .team_service
        .add_members(
            user.id,
            OrganizationId::from_uuid(organization_id),
            TeamId::from_uuid(team_id),
            payload.into(),
        )
        .await?;

    Ok(Json(into_outcome_responses(outcomes)))
}

pub async fn update_team_member_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    Path((organization_id, team_id, user_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(payload): Json<UpdateMemberRoleRequest>,
) -> ApiResult<Json<MemberResponseDto>> {
    let member = state
        .team_service
        .update_member_role(
            user.id,
            OrganizationId::from_uuid(organization_id),
            TeamId::from_uuid(team_id),
            UserId::from_uuid(user_id),
            RoleId::from_uuid(payload.role_id),
        )
        .await?;

    Ok(Json(MemberResponseDto::from(member)))
}

pub async fn remove_team_member_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    Path((organization_id, team_id, user_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state
        .team_service
        .remove_member(
            user.id,
            OrganizationId::from_uuid(organization_id),
            TeamId::from_uuid(team_id),
            UserId::from_uuid(user_id),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
