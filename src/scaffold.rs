// src/scaffold.rs
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{RouteDefinition, RouteKind};
use crate::parser::scan_file;

const ROOT_TEMPLATE: &str = "\
export default function Root({ children }: { children: React.ReactNode }) {
   return <>{children}</>;
}";

const LAYOUT_TEMPLATE: &str = "\
export default function Layout({ children }: { children: React.ReactNode }) {
   return <div>{children}</div>;
}";

const PAGE_TEMPLATE: &str = "\
export default function Page() {
    return <div>New page</div>;
}
";

const NOT_FOUND_TEMPLATE: &str = r#"
export const Head = {
    title: "Page not found",
};

export default function NotFoundPage() {
    return (
        <div style={styles.container}>
            <h1 style={styles.title}>404 - Page Not Found</h1>
            <p>The page you are looking for does not exist or has been moved.</p>
            <a href="/" style={styles.link}>Back to home page</a>
        </div>
    );
}

const styles = {
    container: {
        display: 'flex',
        flexDirection: 'column',
        alignItems: 'center',
        justifyContent: 'center',
        minHeight: '100vh',
        textAlign: 'center',
        padding: '2rem'
    },
    title: {
        fontSize: '3rem',
        marginBottom: '1rem',
        color: '#ff4444'
    },
    link: {
        color: '#0066cc',
        textDecoration: 'none',
    }
} as const;
"#;

const ERROR_TEMPLATE: &str = r#"
import React, { Component, ErrorInfo, ReactNode } from 'react';

interface ErrorBoundaryProps {
    children: ReactNode;
    fallback?: ReactNode;
    onError?: (error: Error, errorInfo: ErrorInfo) => void;
}

interface ErrorBoundaryState {
    hasError: boolean;
    error?: Error;
}

class ErrorBoundary extends Component<ErrorBoundaryProps, ErrorBoundaryState> {
    constructor(props: ErrorBoundaryProps) {
        super(props);
        this.state = { hasError: false };
    }

    static getDerivedStateFromError(error: Error): ErrorBoundaryState {
        return { hasError: true, error };
    }

    componentDidCatch(error: Error, errorInfo: ErrorInfo): void {
        this.props.onError?.(error, errorInfo);
    }

    render(): ReactNode {
        if (this.state.hasError) {
            return this.props.fallback || (
                <div>
                    <h2>Something went wrong</h2>
                    <pre>{this.state.error?.message}</pre>
                    <button onClick={() => this.setState({ hasError: false })}>Try again</button>
                </div>
            );
        }
        return this.props.children;
    }
}

export default ErrorBoundary;
"#;

const DEFAULT_NOT_FOUND_FILE: &str =
    "export default function NotFound() { return <div>404 - Page Not Found</div>; }\n";

const DEFAULT_ERROR_FILE: &str = r#"import { ErrorBoundary } from 'react-error-boundary';

export default function ErrorBoundaryWrapper({ children }: { children: React.ReactNode }) {
    return (
        <ErrorBoundary fallback={<div>Something went wrong</div>}>
            {children}
        </ErrorBoundary>
    );
}
"#;

/// 種類ごとの既定の中身
pub fn template_for(kind: RouteKind) -> &'static str {
    match kind {
        RouteKind::Root => ROOT_TEMPLATE,
        RouteKind::Layout => LAYOUT_TEMPLATE,
        RouteKind::Error => ERROR_TEMPLATE,
        RouteKind::NotFound => NOT_FOUND_TEMPLATE,
        RouteKind::Page => PAGE_TEMPLATE,
    }
}

/// default export を持たないファイルを既定の中身で置き換える。
///
/// 書き換えたら true。構文エラーのファイルには触らない。
pub fn ensure_default_export(file_path: &Path, kind: RouteKind) -> Result<bool> {
    let scan = match scan_file(file_path) {
        Ok(scan) => scan,
        Err(Error::Parse { path, message }) => {
            tracing::warn!(file = %path.display(), %message, "not scaffolding unparsable file");
            return Ok(false);
        }
        Err(e) => return Err(e),
    };
    if scan.has_default_export {
        return Ok(false);
    }

    fs::write(file_path, template_for(kind)).map_err(|e| Error::io(file_path, e))?;
    tracing::info!(file = %file_path.display(), %kind, "wrote default export");
    Ok(true)
}

/// 既定の not_found / error ルートのファイルが無ければ作る。作ったら true
pub fn ensure_default_file(route: &RouteDefinition) -> Result<bool> {
    let path = Path::new(&route.file_path);
    if path.exists() {
        return Ok(false);
    }
    let contents = match route.kind {
        RouteKind::NotFound => DEFAULT_NOT_FOUND_FILE,
        RouteKind::Error => DEFAULT_ERROR_FILE,
        other => template_for(other),
    };
    fs::write(path, contents).map_err(|e| Error::io(path, e))?;
    tracing::info!(file = %route.file_path, kind = %route.kind, "created default route file");
    Ok(true)
}
