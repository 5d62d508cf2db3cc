//! Command handlers. Each one drives a controller from the application
//! context and prints the resulting view to stdout.

use color_eyre::eyre::{bail, eyre};
use color_eyre::Result;

use crate::app::AppContext;
use crate::auth::LoginForm;
use crate::models::{AuthOutcome, Material};
use crate::notifications::NoticeLevel;

pub async fn login(app: &AppContext, email: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };
    match app.auth().login_form(&LoginForm::new(email, password)).await {
        AuthOutcome::Success(user) => {
            println!("Signed in as {} <{}>", user.name, user.email);
            Ok(())
        }
        AuthOutcome::Failure(message) => bail!(message),
    }
}

pub async fn logout(app: &AppContext) -> Result<()> {
    app.auth().logout().await;
    println!("Signed out");
    Ok(())
}

pub async fn whoami(app: &AppContext) -> Result<()> {
    let Some(user) = app.auth().user() else {
        bail!("Not signed in. Run `portal login <email>` first.");
    };
    println!("{} <{}>", user.name, user.email);
    if let Some(role) = &user.role {
        println!("role: {}", role);
    }
    Ok(())
}

pub async fn explore(app: &AppContext, query: &str) -> Result<()> {
    let mut explore = app.explore();
    explore.mount(query).await;
    print_notices(app);

    if let Some(error) = explore.error() {
        bail!(error.to_string());
    }

    let state = explore.state();
    let sections = explore.sections();
    if state.shows_curated_sections() {
        for (title, section) in [
            ("Recomendados", &sections.recommended),
            ("Em alta", &sections.trending),
            ("Recentes", &sections.recent),
        ] {
            if section.materials.is_empty() {
                continue;
            }
            println!("== {} ==", title);
            for material in &section.materials {
                print_material_line(material);
            }
            println!();
        }
    }

    let pagination = explore.pagination();
    println!(
        "== {} ({} resultados, página {} de {}) ==",
        state.active_tab,
        pagination.total_elements,
        pagination.current_page + 1,
        pagination.total_pages.max(1)
    );
    for material in explore.materials() {
        print_material_line(material);
    }
    if !explore.topics().is_empty() {
        println!();
        println!("Tópicos em alta: {}", explore.topics().join(", "));
    }
    Ok(())
}

pub async fn material(app: &AppContext, id: &str) -> Result<()> {
    let mut detail = app.detail();
    detail.load(id).await;
    print_notices(app);

    let material = match (detail.material(), detail.error()) {
        (Some(material), _) => material,
        (None, Some(error)) => bail!(error.to_string()),
        (None, None) => return Err(eyre!("Material {} not found", id)),
    };

    println!("{} [{}]", material.title, material.material_type.label());
    println!("{} · {}", material.author, material.area.label());
    if !material.description.is_empty() {
        println!();
        println!("{}", material.description);
    }
    println!();
    println!(
        "★ {:.1} ({} avaliações) · {} curtidas · {} downloads · {} comentários",
        material.average_rating,
        material.total_ratings,
        material.like_count,
        material.total_download,
        material.comment_count
    );
    if !material.keywords.is_empty() {
        println!("Palavras-chave: {}", material.keywords.join(", "));
    }

    if !detail.comments().is_empty() {
        println!();
        println!("== Comentários ==");
        for comment in detail.comments() {
            println!("{}: {} ({} curtidas)", comment.author, comment.content, comment.likes);
        }
    }
    if !detail.related().is_empty() {
        println!();
        println!("== Relacionados ==");
        for related in detail.related() {
            print_material_line(related);
        }
    }
    Ok(())
}

pub async fn rate(app: &AppContext, id: &str, stars: u8) -> Result<()> {
    let mut detail = app.detail();
    detail.load(id).await;
    if let Some(error) = detail.error() {
        print_notices(app);
        bail!(error.to_string());
    }
    detail.rate(stars).await;

    let failed = app
        .notifier()
        .pending()
        .iter()
        .any(|notice| notice.level == NoticeLevel::Error);
    print_notices(app);
    if failed {
        bail!("Rating was not recorded");
    }
    if let Some(material) = detail.material() {
        println!(
            "★ {:.1} ({} avaliações)",
            material.average_rating, material.total_ratings
        );
    }
    Ok(())
}

fn print_material_line(material: &Material) {
    println!(
        "  #{:<6} {} [{}] ★ {:.1} · {} downloads",
        material.id,
        material.title,
        material.material_type.label(),
        material.average_rating,
        material.total_download
    );
}

fn print_notices(app: &AppContext) {
    for notice in app.notifier().drain() {
        eprintln!("[{}] {}", notice.level.as_str(), notice.message);
    }
}

fn read_password() -> Result<String> {
    Ok(rpassword::prompt_password("Senha: ")?)
}
